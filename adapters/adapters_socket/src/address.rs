//! Address Codec Module
//!
//! Converts between interpreter address tuples and native address records.
//!
//! - IPv4: `(address, port)`
//! - IPv6: `(address, port, flow_info, scope_id)`
//!
//! Address text must be a numeric literal of the socket's family; names are
//! resolved by `getaddrinfo`, never here.

use crate::native::AddressFamily;
use entities_objects::{Errno, Obj, ObjError};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

/// Tuple arity for a family
pub fn tuple_arity(family: AddressFamily) -> usize {
    match family {
        AddressFamily::Ipv6 => 4,
        _ => 2,
    }
}

/// Parse an address tuple into a native record for `family`
///
/// # Errors
///
/// * `ObjError::Type` / `ObjError::Value` - not a tuple/list of the family's arity,
///   or elements of the wrong type
/// * `ObjError::Os(EINVAL)` - address text is not a literal of `family`
pub fn encode(family: AddressFamily, addr: &Obj) -> Result<SocketAddr, ObjError> {
    let items = addr.get_array_fixed_n(tuple_arity(family))?;
    let text = items[0].get_str()?;
    // htons() of the interpreter int: only the low 16 bits survive
    let port = items[1].get_int()? as u16;

    match family {
        AddressFamily::Ipv4 => {
            let ip: Ipv4Addr = text.parse().map_err(|_| ObjError::os(Errno::EINVAL))?;
            Ok(SocketAddr::V4(SocketAddrV4::new(ip, port)))
        }
        AddressFamily::Ipv6 => {
            let ip: Ipv6Addr = text.parse().map_err(|_| ObjError::os(Errno::EINVAL))?;
            // flow info is validated but not tracked
            items[2].get_int()?;
            let scope_id = items[3].get_int()? as u32;
            Ok(SocketAddr::V6(SocketAddrV6::new(ip, port, 0, scope_id)))
        }
        AddressFamily::Packet => Err(ObjError::os(Errno::EINVAL)),
    }
}

/// Format a native record as an address tuple
///
/// The port element is `port` as given; the record's own port field is not read.
pub fn decode(addr: &SocketAddr, port: Obj) -> Obj {
    match addr {
        SocketAddr::V4(v4) => Obj::tuple(vec![Obj::Str(v4.ip().to_string()), port]),
        SocketAddr::V6(v6) => Obj::tuple(vec![
            Obj::Str(v6.ip().to_string()),
            port,
            Obj::Int(0),
            Obj::Int(v6.scope_id() as i64),
        ]),
    }
}
