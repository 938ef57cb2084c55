//! Offloaded TLS Module
//!
//! Socket methods that only exist when the modem terminates TLS and owns the
//! packet data network contexts.

use crate::native::{SocketOption, TlsPeerVerify};
use crate::socket::SocketHandle;
use entities_objects::{Obj, ObjError};
use log::debug;

impl SocketHandle {
    /// Configure TLS on the socket
    ///
    /// # Arguments
    ///
    /// * `sec_tag` - Credential tag provisioned on the modem
    /// * `verify` - `TLS_PEER_VERIFY_*` code, `None` for required verification
    /// * `hostname` - Server name for SNI and certificate checks, `None` or `Obj::None` to skip
    ///
    /// # Errors
    ///
    /// The first option the stack rejects aborts the call with its errno.
    pub fn tlswrap(
        &mut self,
        sec_tag: &Obj,
        verify: Option<&Obj>,
        hostname: Option<&Obj>,
    ) -> Result<(), ObjError> {
        self.check_closed()?;
        let sec_tag = sec_tag.get_int()? as u32;
        let verify = match verify {
            Some(obj) => {
                let code = obj.get_int()?;
                TlsPeerVerify::from_code(code)
                    .ok_or_else(|| ObjError::value_error(format!("invalid peer verify mode {}", code)))?
            }
            None => TlsPeerVerify::Required,
        };

        self.stack
            .set_option(self.descriptor, &SocketOption::TlsSecTag(sec_tag))?;
        self.stack
            .set_option(self.descriptor, &SocketOption::TlsPeerVerify(verify))?;
        if let Some(hostname) = hostname.filter(|h| **h != Obj::None) {
            let hostname = hostname.get_str()?.to_string();
            self.stack
                .set_option(self.descriptor, &SocketOption::TlsHostname(hostname))?;
        }

        debug!("socket {} wrapped: sec_tag={} verify={:?}", self.descriptor, sec_tag, verify);
        Ok(())
    }

    /// Bind the socket to a packet data network context
    #[cfg(feature = "pdn")]
    pub fn pdn(&mut self, id: &Obj) -> Result<(), ObjError> {
        self.check_closed()?;
        let id = match id {
            Obj::Int(id) => *id as i32,
            other => {
                return Err(ObjError::type_error(format!(
                    "PDN id must be an int, not {}",
                    other.type_name()
                )))
            }
        };
        self.stack
            .set_option(self.descriptor, &SocketOption::BindToPdn(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SocketConfig;
    use crate::native::{
        AddressFamily, MockNetStack, NetStack, Protocol, SocketOption, SocketType, TlsPeerVerify,
    };
    use crate::socket::SocketHandle;
    use entities_objects::{Errno, Obj, ObjError};
    use std::sync::{Arc, Mutex};

    fn open(mock: MockNetStack) -> SocketHandle {
        let stack: Arc<dyn NetStack> = Arc::new(mock);
        SocketHandle::new(
            stack,
            AddressFamily::Ipv4,
            SocketType::Stream,
            Some(Protocol::Tls12),
            SocketConfig::default(),
        )
        .unwrap()
    }

    /// Mock recording every option applied to descriptor 5
    fn recording_mock(applied: Arc<Mutex<Vec<SocketOption>>>) -> MockNetStack {
        let mut mock = MockNetStack::new();
        mock.expect_socket().returning(|_, _, _| Ok(5));
        mock.expect_close().returning(|_| Ok(()));
        mock.expect_set_option().returning(move |fd, option| {
            assert_eq!(fd, 5);
            applied.lock().unwrap().push(option.clone());
            Ok(())
        });
        mock
    }

    #[test]
    fn test_tlswrap_defaults_to_required() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        sock.tlswrap(&Obj::Int(42), None, None).unwrap();
        assert_eq!(
            *applied.lock().unwrap(),
            vec![
                SocketOption::TlsSecTag(42),
                SocketOption::TlsPeerVerify(TlsPeerVerify::Required),
            ]
        );
    }

    #[test]
    fn test_tlswrap_with_hostname() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        sock.tlswrap(&Obj::Int(7), Some(&Obj::Int(0)), Some(&Obj::from("example.com")))
            .unwrap();
        assert_eq!(
            *applied.lock().unwrap(),
            vec![
                SocketOption::TlsSecTag(7),
                SocketOption::TlsPeerVerify(TlsPeerVerify::None),
                SocketOption::TlsHostname("example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_tlswrap_none_hostname_is_skipped() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        sock.tlswrap(&Obj::Int(1), Some(&Obj::Int(1)), Some(&Obj::None))
            .unwrap();
        assert_eq!(applied.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_tlswrap_invalid_verify_mode() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        let err = sock.tlswrap(&Obj::Int(1), Some(&Obj::Int(9)), None).unwrap_err();
        assert!(matches!(err, ObjError::Value(_)));
        assert!(applied.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tlswrap_propagates_stack_error() {
        let mut mock = MockNetStack::new();
        mock.expect_socket().returning(|_, _, _| Ok(5));
        mock.expect_close().returning(|_| Ok(()));
        mock.expect_set_option()
            .times(1)
            .returning(|_, _| Err(Errno(95)));
        let mut sock = open(mock);
        assert_eq!(
            sock.tlswrap(&Obj::Int(1), None, None),
            Err(ObjError::os(95))
        );
    }

    #[cfg(feature = "pdn")]
    #[test]
    fn test_pdn_binds_context() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        sock.pdn(&Obj::Int(1)).unwrap();
        assert_eq!(*applied.lock().unwrap(), vec![SocketOption::BindToPdn(1)]);
    }

    #[cfg(feature = "pdn")]
    #[test]
    fn test_pdn_rejects_non_int() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut sock = open(recording_mock(Arc::clone(&applied)));
        assert!(matches!(sock.pdn(&Obj::from("1")), Err(ObjError::Type(_))));
        assert!(applied.lock().unwrap().is_empty());
    }
}
