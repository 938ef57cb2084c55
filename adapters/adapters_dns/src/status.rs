//! DNS Status Module
//!
//! Status codes delivered with resolver callbacks. Values follow the RTOS
//! resolver's `DNS_EAI_*` numbering and are raised to scripts verbatim.

use std::fmt;

/// Resolver status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnsStatus(pub i32);

impl DnsStatus {
    pub const OK: DnsStatus = DnsStatus(0);
    pub const BAD_FLAGS: DnsStatus = DnsStatus(-1);
    pub const NO_NAME: DnsStatus = DnsStatus(-2);
    pub const AGAIN: DnsStatus = DnsStatus(-3);
    pub const FAIL: DnsStatus = DnsStatus(-4);
    pub const NO_DATA: DnsStatus = DnsStatus(-5);
    pub const FAMILY: DnsStatus = DnsStatus(-6);
    pub const SOCKTYPE: DnsStatus = DnsStatus(-7);
    pub const SERVICE: DnsStatus = DnsStatus(-8);
    pub const ADDR_FAMILY: DnsStatus = DnsStatus(-9);
    pub const MEMORY: DnsStatus = DnsStatus(-10);
    pub const SYSTEM: DnsStatus = DnsStatus(-11);
    pub const OVERFLOW: DnsStatus = DnsStatus(-12);
    pub const IN_PROGRESS: DnsStatus = DnsStatus(-100);
    /// Query abandoned, also reported when the query times out
    pub const CANCELED: DnsStatus = DnsStatus(-101);
    pub const NOT_CANCELED: DnsStatus = DnsStatus(-102);
    /// Every address of the query has been delivered
    pub const ALL_DONE: DnsStatus = DnsStatus(-103);
    pub const IDN_ENCODE: DnsStatus = DnsStatus(-105);

    pub fn code(self) -> i32 {
        self.0
    }

    /// Status as recorded for a finished sub-query: `ALL_DONE` counts as success
    pub fn normalized(self) -> DnsStatus {
        if self == DnsStatus::ALL_DONE {
            DnsStatus::OK
        } else {
            self
        }
    }

    pub fn is_error(self) -> bool {
        self.normalized() != DnsStatus::OK
    }

    fn name(self) -> Option<&'static str> {
        let name = match self {
            DnsStatus::OK => "OK",
            DnsStatus::BAD_FLAGS => "BADFLAGS",
            DnsStatus::NO_NAME => "NONAME",
            DnsStatus::AGAIN => "AGAIN",
            DnsStatus::FAIL => "FAIL",
            DnsStatus::NO_DATA => "NODATA",
            DnsStatus::FAMILY => "FAMILY",
            DnsStatus::SOCKTYPE => "SOCKTYPE",
            DnsStatus::SERVICE => "SERVICE",
            DnsStatus::ADDR_FAMILY => "ADDRFAMILY",
            DnsStatus::MEMORY => "MEMORY",
            DnsStatus::SYSTEM => "SYSTEM",
            DnsStatus::OVERFLOW => "OVERFLOW",
            DnsStatus::IN_PROGRESS => "INPROGRESS",
            DnsStatus::CANCELED => "CANCELED",
            DnsStatus::NOT_CANCELED => "NOTCANCELED",
            DnsStatus::ALL_DONE => "ALLDONE",
            DnsStatus::IDN_ENCODE => "IDN_ENCODE",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for DnsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "DNS_EAI_{} ({})", name, self.0),
            None => write!(f, "DNS status {}", self.0),
        }
    }
}
