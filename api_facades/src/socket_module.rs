//! Socket Module Facade
//!
//! The `socket` module as registered with the interpreter: the socket
//! constructor and `getaddrinfo` taking raw positional arguments, and the
//! module's global table.

use adapters_dns::{family_hint, AddrInfo, ResolverConfig};
use adapters_socket::{
    AddressFamily, NetStack, Protocol, SocketConfig, SocketHandle, SocketType,
};
use entities_objects::{Errno, Obj, ObjError};
use log::debug;
use std::sync::Arc;

/// Resolver consumed by `getaddrinfo` in this build
#[cfg(not(feature = "offload"))]
pub type ModuleResolver = dyn adapters_dns::DnsResolver;
#[cfg(feature = "offload")]
pub type ModuleResolver = dyn adapters_dns::SyncResolver;

/// Entry of the module's global table
#[derive(Debug, Clone, PartialEq)]
pub enum Global {
    /// Constant value
    Value(Obj),
    /// Callable bound to a [`SocketModule`] method
    Callable,
}

fn check_arg_count(name: &str, args: &[Obj], min: usize, max: usize) -> Result<(), ObjError> {
    if args.len() < min || args.len() > max {
        return Err(ObjError::type_error(format!(
            "{}() takes {} to {} positional arguments but {} were given",
            name,
            min,
            max,
            args.len()
        )));
    }
    Ok(())
}

/// The `socket` module
pub struct SocketModule {
    stack: Arc<dyn NetStack>,
    resolver: Arc<ModuleResolver>,
    socket_config: SocketConfig,
    resolver_config: ResolverConfig,
}

impl SocketModule {
    pub fn new(
        stack: Arc<dyn NetStack>,
        resolver: Arc<ModuleResolver>,
        socket_config: SocketConfig,
        resolver_config: ResolverConfig,
    ) -> Self {
        Self {
            stack,
            resolver,
            socket_config,
            resolver_config,
        }
    }

    /// Module over the host network stack and name service, default configuration
    #[cfg(all(unix, not(feature = "offload")))]
    pub fn host() -> Result<Self, ObjError> {
        let resolver = adapters_dns::HostResolver::new()?;
        Ok(Self::new(
            Arc::new(adapters_socket::HostStack::new()),
            Arc::new(resolver),
            SocketConfig::default(),
            ResolverConfig::default(),
        ))
    }

    /// Module over the host network stack and name service, default configuration
    #[cfg(all(unix, feature = "offload"))]
    pub fn host() -> Result<Self, ObjError> {
        Ok(Self::new(
            Arc::new(adapters_socket::HostStack::new()),
            Arc::new(adapters_dns::HostSyncResolver),
            SocketConfig::default(),
            ResolverConfig::default(),
        ))
    }

    /// `socket([family[, type[, proto[, fileno]]]])`
    ///
    /// Defaults to an IPv4 stream socket. A protocol of `-1` picks TCP for
    /// stream sockets and UDP otherwise. `fileno` is accepted and ignored.
    pub fn socket(&self, args: &[Obj]) -> Result<SocketHandle, ObjError> {
        check_arg_count("socket", args, 0, 4)?;

        let family = match args.first() {
            Some(arg) => AddressFamily::from_code(arg.get_int()?)
                .ok_or(ObjError::os(Errno::EAFNOSUPPORT))?,
            None => AddressFamily::Ipv4,
        };
        let socket_type = match args.get(1) {
            Some(arg) => SocketType::from_code(arg.get_int()?)
                .ok_or(ObjError::os(Errno::EPROTOTYPE))?,
            None => SocketType::Stream,
        };
        let protocol = match args.get(2) {
            Some(arg) => match arg.get_int()? {
                -1 => None,
                code => Some(Protocol::from_code(code)),
            },
            None => None,
        };

        SocketHandle::new(
            Arc::clone(&self.stack),
            family,
            socket_type,
            protocol,
            self.socket_config,
        )
    }

    /// `getaddrinfo(host, port[, family])`
    ///
    /// Returns a list of `(family, type, proto, canonname, sockaddr)` tuples.
    /// Without `family` the configured default is used; `0` asks for every family.
    pub fn getaddrinfo(&self, args: &[Obj]) -> Result<Obj, ObjError> {
        check_arg_count("getaddrinfo", args, 2, 3)?;
        let host = args[0].get_str()?;
        let port = &args[1];
        let family = match args.get(2) {
            Some(arg) => family_hint(arg.get_int()?),
            None => self.resolver_config.default_family,
        };
        debug!("getaddrinfo({}, {:?}, {:?})", host, port, family);

        let entries = self.resolve(host, port, family)?;
        Ok(Obj::List(entries.iter().map(AddrInfo::to_obj).collect()))
    }

    #[cfg(not(feature = "offload"))]
    fn resolve(
        &self,
        host: &str,
        port: &Obj,
        family: Option<AddressFamily>,
    ) -> Result<Vec<AddrInfo>, ObjError> {
        adapters_dns::getaddrinfo(self.resolver.as_ref(), &self.resolver_config, host, port, family)
    }

    #[cfg(feature = "offload")]
    fn resolve(
        &self,
        host: &str,
        port: &Obj,
        family: Option<AddressFamily>,
    ) -> Result<Vec<AddrInfo>, ObjError> {
        adapters_dns::getaddrinfo(self.resolver.as_ref(), host, port, family)
    }

    /// Global table of the module, in registration order
    pub fn globals() -> Vec<(&'static str, Global)> {
        let int = |v: i32| Global::Value(Obj::Int(v as i64));
        let mut globals = vec![
            ("__name__", Global::Value(Obj::from("socket"))),
            ("socket", Global::Callable),
            ("AF_INET", int(AddressFamily::Ipv4.code())),
            ("AF_INET6", int(AddressFamily::Ipv6.code())),
            ("AF_PACKET", int(AddressFamily::Packet.code())),
            ("SOCK_STREAM", int(SocketType::Stream.code())),
            ("SOCK_DGRAM", int(SocketType::Datagram.code())),
            ("SOCK_RAW", int(SocketType::Raw.code())),
        ];
        #[cfg(feature = "offload")]
        {
            use adapters_socket::TlsPeerVerify;
            globals.extend([
                ("IPPROTO_TLS_1_2", int(Protocol::Tls12.code())),
                ("TLS_PEER_VERIFY_NONE", int(TlsPeerVerify::None.code())),
                ("TLS_PEER_VERIFY_OPTIONAL", int(TlsPeerVerify::Optional.code())),
                ("TLS_PEER_VERIFY_REQUIRED", int(TlsPeerVerify::Required.code())),
            ]);
        }
        globals.extend([
            ("SOL_SOCKET", int(1)),
            ("SO_REUSEADDR", int(2)),
            ("getaddrinfo", Global::Callable),
        ]);
        globals
    }

    /// Look up one global by name
    pub fn global(name: &str) -> Option<Global> {
        Self::globals()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, g)| g)
    }
}
