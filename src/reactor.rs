//! The single-threaded, readiness-driven event loop (§4.1, §5). Owns the
//! listening socket, every accepted client socket, and the registries; it is
//! the only place in this crate that touches a file descriptor.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::net::SocketAddr;

use log::{debug, info, warn};
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};

use crate::client::Handle;
use crate::config::Config;
use crate::dispatcher::dispatch;
use crate::errors::RelayError;
use crate::replies::Reply;
use crate::state::{Outbox, State};

const LISTENER_TOKEN: Token = Token(0);
const FIRST_CLIENT_TOKEN: Token = Token(1);
const READ_BUF_SIZE: usize = 1024;

/// Binds `0.0.0.0:port`, then runs the accept/read/dispatch loop until the
/// listener itself fails. Never panics on a per-connection error; only
/// setup failures are reported via `RelayError`.
pub fn start(port: u16, password: &str, config: &Config) -> Result<(), RelayError> {
    Reactor::bind(port, password, config)?.run()
}

/// The bound, not-yet-running reactor. Split from `start` so callers that
/// need the resolved local address (port `0` binds an ephemeral one, used by
/// the integration tests) can read it before handing control to `run`.
pub struct Reactor {
    listener: TcpListener,
    poll: Poll,
    next_token: usize,
    sockets: HashMap<Handle, TcpStream>,
    state: State,
    password: String,
}

impl Reactor {
    pub fn bind(port: u16, password: &str, config: &Config) -> Result<Self, RelayError> {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        let mut listener = TcpListener::bind(addr).map_err(|source| RelayError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        let poll = Poll::new().map_err(RelayError::Listen)?;
        poll.registry()
            .register(&mut listener, LISTENER_TOKEN, Interest::READABLE)
            .map_err(RelayError::Listen)?;

        info!(
            "{} listening on {} (configured backlog {})",
            config.server_name,
            listener.local_addr().unwrap_or(addr),
            config.listen_backlog
        );

        Ok(Reactor {
            listener,
            poll,
            next_token: FIRST_CLIENT_TOKEN.0,
            sockets: HashMap::new(),
            state: State::new(),
            password: password.to_string(),
        })
    }

    /// The address actually bound — useful when `port` was `0`.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Reactor {
    /// Runs the accept/read/dispatch loop until the listener itself fails.
    pub fn run(&mut self) -> Result<(), RelayError> {
        let mut events = Events::with_capacity(256);
        loop {
            if let Err(e) = self.poll.poll(&mut events, None) {
                if e.kind() == ErrorKind::Interrupted {
                    continue;
                }
                return Err(RelayError::Poll(e));
            }

            // mio/epoll makes no promise about the order events for one wake
            // arrive in, but §4.1 requires accept work to precede all client
            // reads, with clients then handled in registry order. Handles
            // are assigned by a monotonically increasing counter and never
            // reused, so sorting ready client tokens ascending recovers that
            // registry order without keeping a separate index.
            let mut listener_ready = false;
            let mut ready_clients: Vec<Handle> = Vec::new();
            for event in events.iter() {
                if event.token() == LISTENER_TOKEN {
                    listener_ready = true;
                } else {
                    ready_clients.push(event.token().0);
                }
            }

            if listener_ready {
                self.accept_one();
            }
            ready_clients.sort_unstable();
            for handle in ready_clients {
                self.read_client(handle);
            }
        }
    }

    /// Accepts at most one pending connection (§4.1 accept policy).
    fn accept_one(&mut self) {
        let (mut stream, peer) = match self.listener.accept() {
            Ok(pair) => pair,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return,
            Err(e) => {
                warn!("accept failed: {e}");
                return;
            }
        };

        let handle = self.next_token;
        self.next_token += 1;

        if let Err(e) = self
            .poll
            .registry()
            .register(&mut stream, Token(handle), Interest::READABLE)
        {
            warn!("failed to register accepted connection from {peer}: {e}");
            return;
        }

        self.state.clients.insert(handle);
        if let Some(info) = self.state.clients.get_mut(handle) {
            info.password_prompt_sent = true;
        }
        let _ = stream.write_all(Reply::PasswordPrompt.text().as_bytes());
        self.sockets.insert(handle, stream);
        info!("accepted connection {handle} from {peer}");
    }

    fn read_client(&mut self, handle: Handle) {
        let Some(stream) = self.sockets.get_mut(&handle) else {
            return;
        };

        let mut buf = [0u8; READ_BUF_SIZE];
        let bytes = loop {
            match stream.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("read error on {handle}: {e}");
                    self.drop_client(handle);
                    return;
                }
            }
        };

        if bytes == 0 {
            info!("connection {handle} closed by peer");
            self.drop_client(handle);
            return;
        }

        let authenticated = self
            .state
            .clients
            .get(handle)
            .map(|info| info.authenticated)
            .unwrap_or(false);

        if !authenticated {
            self.authenticate(handle, &buf[..bytes]);
            return;
        }

        let Some(info) = self.state.clients.get_mut(handle) else {
            return;
        };
        info.rx_buffer.extend_from_slice(&buf[..bytes]);

        let mut out = Outbox::new();
        while let Some(line) = Self::take_line(&mut self.state.clients.get_mut(handle).unwrap().rx_buffer) {
            if line.is_empty() {
                continue;
            }
            debug!("dispatching from {handle}: {line}");
            dispatch(&mut self.state, handle, &line, &mut out);
        }
        self.flush(out);
    }

    /// Extracts one `\n`-terminated line (CR stripped) from `buffer`, if
    /// complete. Leaves any trailing partial line in place.
    fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
        let pos = buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = buffer.drain(..=pos).collect();
        line.pop(); // trailing \n
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn authenticate(&mut self, handle: Handle, bytes: &[u8]) {
        let response = String::from_utf8_lossy(bytes);
        let trimmed = response.trim_end();
        if trimmed == self.password {
            if let Some(info) = self.state.clients.get_mut(handle) {
                info.authenticated = true;
            }
            info!("connection {handle} authenticated");
            self.write_to(handle, Reply::PasswordAccepted.text());
        } else {
            warn!("connection {handle} sent wrong password");
            self.write_to(handle, Reply::PasswordRejected.text());
            self.drop_client(handle);
        }
    }

    fn flush(&mut self, mut out: Outbox) {
        for (handle, line) in out.drain() {
            self.write_to(handle, line);
        }
    }

    fn write_to(&mut self, handle: Handle, mut line: String) {
        line.push('\n');
        let Some(stream) = self.sockets.get_mut(&handle) else {
            return;
        };
        if let Err(e) = stream.write_all(line.as_bytes())
            && e.kind() != ErrorKind::WouldBlock
        {
            debug!("write error on {handle}: {e}, dropping");
            self.drop_client(handle);
        }
    }

    fn drop_client(&mut self, handle: Handle) {
        if let Some(mut stream) = self.sockets.remove(&handle) {
            let _ = self.poll.registry().deregister(&mut stream);
        }
        self.state.disconnect(handle);
    }
}
