//! Power-management widgets and the routing graph between them.

use bytes::BufMut;

use crate::error::{TypeError, TypeResult};
use crate::limits::NAME_LEN;
use crate::wire::{put_name, wire_len, WireFormat};

/// Widget kinds, numbered as the driver expects them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum WidgetType {
    #[default]
    Input = 0,
    Output = 1,
    Mux = 2,
    Mixer = 3,
    Pga = 4,
    OutDrv = 5,
    Adc = 6,
    Dac = 7,
    Switch = 8,
    Pre = 9,
    Post = 10,
    AifIn = 11,
    AifOut = 12,
    DaiIn = 13,
    DaiOut = 14,
    DaiLink = 15,
}

impl WidgetType {
    const NAMES: [(&'static str, WidgetType); 16] = [
        ("input", Self::Input),
        ("output", Self::Output),
        ("mux", Self::Mux),
        ("mixer", Self::Mixer),
        ("pga", Self::Pga),
        ("out_drv", Self::OutDrv),
        ("adc", Self::Adc),
        ("dac", Self::Dac),
        ("switch", Self::Switch),
        ("pre", Self::Pre),
        ("post", Self::Post),
        ("aif_in", Self::AifIn),
        ("aif_out", Self::AifOut),
        ("dai_in", Self::DaiIn),
        ("dai_out", Self::DaiOut),
        ("dai_link", Self::DaiLink),
    ];

    /// Look up a widget kind by its source-file name (`"pga"`, `"aif_in"`).
    pub fn from_name(name: &str) -> TypeResult<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, t)| *t)
            .ok_or_else(|| TypeError::UnknownName {
                what: "widget type",
                name: name.to_string(),
            })
    }
}

/// A DAPM widget. Embedded kcontrols follow it as part of its tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Widget {
    pub kind: WidgetType,
    pub name: String,
    pub stream_name: String,
    pub reg: i32,
    pub shift: u32,
    pub mask: u32,
    pub subseq: u32,
    pub invert: u32,
    pub ignore_suspend: u32,
    pub event_flags: u16,
    pub event_type: u16,
    pub num_kcontrols: u32,
    pub priv_size: u32,
}

impl Widget {
    pub fn new(name: &str) -> Self {
        Self {
            kind: WidgetType::default(),
            name: name.to_string(),
            stream_name: String::new(),
            reg: 0,
            shift: 0,
            mask: 0,
            subseq: 0,
            invert: 0,
            ignore_suspend: 0,
            event_flags: 0,
            event_type: 0,
            num_kcontrols: 0,
            priv_size: 0,
        }
    }
}

impl WireFormat for Widget {
    const WIRE_SIZE: usize = 4 + 4 + 2 * NAME_LEN + 6 * 4 + 2 + 2 + 4 + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.kind as u32);
        put_name(buf, &self.name);
        put_name(buf, &self.stream_name);
        buf.put_i32_le(self.reg);
        buf.put_u32_le(self.shift);
        buf.put_u32_le(self.mask);
        buf.put_u32_le(self.subseq);
        buf.put_u32_le(self.invert);
        buf.put_u32_le(self.ignore_suspend);
        buf.put_u16_le(self.event_flags);
        buf.put_u16_le(self.event_type);
        buf.put_u32_le(self.num_kcontrols);
        buf.put_u32_le(self.priv_size);
    }
}

/// One edge of the routing graph: `source -> [control] -> sink`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteLine {
    pub source: String,
    pub control: String,
    pub sink: String,
}

impl RouteLine {
    /// Parse `"source, control, sink"`.
    ///
    /// Exactly two commas are required. Whitespace around each field is
    /// dropped; the control may be empty, the endpoints may not.
    pub fn parse(line: &str) -> TypeResult<Self> {
        let malformed = |reason: &str| TypeError::MalformedRoute {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [source, control, sink] = fields.as_slice() else {
            return Err(malformed("expected exactly three comma-separated fields"));
        };
        if source.is_empty() {
            return Err(malformed("empty source"));
        }
        if sink.is_empty() {
            return Err(malformed("empty sink"));
        }
        Ok(Self {
            source: source.to_string(),
            control: control.to_string(),
            sink: sink.to_string(),
        })
    }
}

impl WireFormat for RouteLine {
    const WIRE_SIZE: usize = 3 * NAME_LEN;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        put_name(buf, &self.source);
        put_name(buf, &self.control);
        put_name(buf, &self.sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn widget_size() {
        assert_eq!(Widget::new("w").to_bytes().len(), Widget::WIRE_SIZE);
        assert_eq!(Widget::WIRE_SIZE, 132);
    }

    #[test]
    fn widget_types_by_name() {
        assert_eq!(WidgetType::from_name("pga").unwrap(), WidgetType::Pga);
        assert_eq!(WidgetType::from_name("AIF_OUT").unwrap(), WidgetType::AifOut);
        assert!(WidgetType::from_name("speaker").is_err());
    }

    #[test]
    fn route_fields_are_trimmed() {
        let route = RouteLine::parse("  W1 ,M1,   W2 ").unwrap();
        assert_eq!(route.source, "W1");
        assert_eq!(route.control, "M1");
        assert_eq!(route.sink, "W2");
    }

    #[test]
    fn route_control_may_be_empty() {
        let route = RouteLine::parse("Mic, , ADC").unwrap();
        assert!(route.control.is_empty());
    }

    #[test]
    fn route_rejects_wrong_field_count() {
        assert!(RouteLine::parse("a, b").is_err());
        assert!(RouteLine::parse("a, b, c, d").is_err());
        assert!(RouteLine::parse(", b, c").is_err());
        assert!(RouteLine::parse("a, b, ").is_err());
    }

    #[test]
    fn route_encodes_in_field_order() {
        let bytes = RouteLine::parse("src, ctl, dst").unwrap().to_bytes();
        assert_eq!(&bytes[..3], b"src");
        assert_eq!(&bytes[NAME_LEN..NAME_LEN + 3], b"ctl");
        assert_eq!(&bytes[2 * NAME_LEN..2 * NAME_LEN + 3], b"dst");
    }

    proptest! {
        #[test]
        fn route_parse_recovers_fields(
            source in "[A-Za-z0-9 ]{0,8}[A-Za-z0-9]",
            control in "[A-Za-z0-9]{0,8}",
            sink in "[A-Za-z0-9][A-Za-z0-9 ]{0,8}",
            pad in " {0,3}",
        ) {
            let line = format!("{pad}{source}{pad},{pad}{control}{pad},{pad}{sink}{pad}");
            let route = RouteLine::parse(&line).unwrap();
            prop_assert_eq!(route.source, source.trim());
            prop_assert_eq!(route.control, control);
            prop_assert_eq!(route.sink, sink.trim());
        }
    }
}
