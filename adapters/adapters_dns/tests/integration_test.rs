//! Integration tests for adapters_dns crate
//!
//! These tests resolve names through the host resolvers end to end and check
//! the shape and order of the returned entries.

use adapters_dns::*;
use adapters_socket::AddressFamily;
use entities_objects::{Obj, ObjError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn addr_text(info: &AddrInfo) -> String {
    let arity = info.sockaddr.len().unwrap();
    info.sockaddr.get_array_fixed_n(arity).unwrap()[0]
        .get_str()
        .unwrap()
        .to_string()
}

#[cfg(not(feature = "offload"))]
mod callback_path {
    use super::*;

    fn resolve(host: &str, family: Option<AddressFamily>) -> Result<Vec<AddrInfo>, ObjError> {
        init_logging();
        let resolver = HostResolver::new().unwrap();
        getaddrinfo(&resolver, &ResolverConfig::default(), host, &Obj::Int(8080), family)
    }

    #[test]
    fn test_ipv4_literal() {
        let results = resolve("127.0.0.1", Some(AddressFamily::Ipv4)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].to_obj(),
            Obj::tuple(vec![
                Obj::Int(1),
                Obj::Int(1),
                Obj::Int(6),
                Obj::from(""),
                Obj::tuple(vec![Obj::from("127.0.0.1"), Obj::Int(8080)]),
            ])
        );
    }

    #[test]
    fn test_any_family_masks_missing_ipv6() {
        // the AAAA pass finds nothing for an IPv4 literal, the A pass succeeds
        let results = resolve("127.0.0.1", None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].family, AddressFamily::Ipv4);
    }

    #[test]
    fn test_ipv6_literal() {
        let results = resolve("::1", Some(AddressFamily::Ipv6)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(addr_text(&results[0]), "::1");
        assert_eq!(results[0].sockaddr.len(), Some(4));
    }

    #[test]
    fn test_wrong_family_raises_no_data() {
        assert_eq!(
            resolve("::1", Some(AddressFamily::Ipv4)),
            Err(ObjError::os(DnsStatus::NO_DATA.code()))
        );
    }

    #[test]
    fn test_any_family_orders_ipv6_first() {
        let results = match resolve("localhost", None) {
            Ok(results) => results,
            Err(_) => return,
        };
        let first_v4 = results.iter().position(|r| r.family == AddressFamily::Ipv4);
        let last_v6 = results.iter().rposition(|r| r.family == AddressFamily::Ipv6);
        if let (Some(v4), Some(v6)) = (first_v4, last_v6) {
            assert!(v6 < v4);
        }
    }

    #[test]
    fn test_unresolvable_name_raises() {
        let err = resolve("no-such-host.invalid", Some(AddressFamily::Ipv4)).unwrap_err();
        assert!(matches!(err, ObjError::Os(_)));
    }

    #[test]
    fn test_consecutive_calls_share_resolver() {
        init_logging();
        let resolver = HostResolver::new().unwrap();
        let config = ResolverConfig::default();
        for _ in 0..3 {
            let results = getaddrinfo(&resolver, &config, "127.0.0.1", &Obj::Int(1), None).unwrap();
            assert_eq!(results.len(), 1);
        }
    }
}

#[cfg(feature = "offload")]
mod offload_path {
    use super::*;

    #[test]
    fn test_literal_through_sync_resolver() {
        init_logging();
        let resolver = HostSyncResolver;
        let results = getaddrinfo(&resolver, "127.0.0.1", &Obj::Int(443), Some(AddressFamily::Ipv4)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(addr_text(&results[0]), "127.0.0.1");
    }

    #[test]
    fn test_no_match_raises() {
        init_logging();
        let resolver = HostSyncResolver;
        assert_eq!(
            getaddrinfo(&resolver, "::1", &Obj::Int(443), Some(AddressFamily::Ipv4)),
            Err(ObjError::os(DnsStatus::NO_DATA.code()))
        );
    }
}
