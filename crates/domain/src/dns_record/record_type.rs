use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    PTR,
    SOA,
    SRV,
    TXT,

    OPT,

    /// Private marker: the name is resolved through the proxy chain.
    /// Has no wire representation.
    PROXY,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::NS => "NS",
            RecordType::PTR => "PTR",
            RecordType::SOA => "SOA",
            RecordType::SRV => "SRV",
            RecordType::TXT => "TXT",
            RecordType::OPT => "OPT",
            RecordType::PROXY => "PROXY",
        }
    }

    pub fn to_u16(&self) -> Option<u16> {
        match self {
            RecordType::A => Some(1),
            RecordType::NS => Some(2),
            RecordType::CNAME => Some(5),
            RecordType::SOA => Some(6),
            RecordType::PTR => Some(12),
            RecordType::MX => Some(15),
            RecordType::TXT => Some(16),
            RecordType::AAAA => Some(28),
            RecordType::SRV => Some(33),
            RecordType::OPT => Some(41),
            RecordType::PROXY => None,
        }
    }

    /// Wire codes never map to `PROXY`.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(RecordType::A),
            2 => Some(RecordType::NS),
            5 => Some(RecordType::CNAME),
            6 => Some(RecordType::SOA),
            12 => Some(RecordType::PTR),
            15 => Some(RecordType::MX),
            16 => Some(RecordType::TXT),
            28 => Some(RecordType::AAAA),
            33 => Some(RecordType::SRV),
            41 => Some(RecordType::OPT),
            _ => None,
        }
    }

    pub fn is_wire(&self) -> bool {
        self.to_u16().is_some()
    }

    /// Types that may be declared for a host in the zones document.
    pub fn is_storable(&self) -> bool {
        !matches!(self, RecordType::OPT)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "CNAME" => Ok(RecordType::CNAME),
            "MX" => Ok(RecordType::MX),
            "NS" => Ok(RecordType::NS),
            "PTR" => Ok(RecordType::PTR),
            "SOA" => Ok(RecordType::SOA),
            "SRV" => Ok(RecordType::SRV),
            "TXT" => Ok(RecordType::TXT),
            "OPT" => Ok(RecordType::OPT),
            "PROXY" => Ok(RecordType::PROXY),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}
