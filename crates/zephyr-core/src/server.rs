//! Native HTTP server
//!
//! hyper HTTP/1.1 on a multi-threaded tokio runtime:
//! - `ServerConfig` describes where and with how many workers to serve
//! - `Listener::bind` is the only fallible startup step; holding a
//!   `Listener` means the server is serving
//! - one task per accepted connection, TCP_NODELAY on every stream

use crate::{App, Error, Method, Request, Response, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Response type produced by every service in this crate
pub type HyperResponse = hyper::Response<Full<Bytes>>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub hostname: String,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "0.0.0.0".to_string(),
            workers: num_cpus::get(),
        }
    }
}

impl ServerConfig {
    /// All interfaces on `port`, one worker per CPU
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Override the bind address (an IP literal)
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Resolve hostname and port into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.hostname.trim_start_matches('[').trim_end_matches(']');
        let ip = host
            .parse::<std::net::IpAddr>()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", self.hostname, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Build the multi-threaded runtime the server runs on
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers.max(1))
            .enable_all()
            .build()?;
        Ok(runtime)
    }
}

/// Create a bound, listening TCP socket
///
/// SO_REUSEADDR is set so restarts do not trip over TIME_WAIT. SO_REUSEPORT
/// is not: a second process on the same port must fail to bind.
pub fn create_socket(addr: &SocketAddr) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    Ok(socket)
}

/// A bound listening socket, owned by the accept loop
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind the configured address
    ///
    /// Must run inside a tokio runtime. Fails if the port is taken; there is
    /// no retry.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let socket = create_socket(&addr)?;
        let inner = TcpListener::from_std(socket.into())?;
        let local_addr = inner.local_addr()?;

        tracing::info!(address = %local_addr, workers = config.workers, "listening");
        Ok(Self { inner, local_addr })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections forever, answering every request with `handler`
    ///
    /// Only returns if the runtime is torn down underneath it. Accept errors
    /// are logged and skipped.
    pub async fn serve<H>(self, handler: H) -> Result<()>
    where
        H: Fn(hyper::Request<hyper::body::Incoming>) -> HyperResponse + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);

        loop {
            let (stream, peer) = match self.inner.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };

            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(%peer, error = %e, "could not set TCP_NODELAY");
            }

            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    std::future::ready(Ok::<_, Infallible>(handler(req)))
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = %e, "connection error");
                }
            });
        }
    }
}

/// The startup line printed once the listener is bound
pub fn banner(label: &str, port: u16) -> String {
    format!("{label} running on port {port}")
}

/// Bind, announce, serve
///
/// Builds the runtime from `config`, binds, prints [`banner`] to stdout and
/// then serves forever. Errors before serving (runtime, bind) are returned
/// to the caller.
pub fn run<H>(label: &str, config: ServerConfig, handler: H) -> Result<()>
where
    H: Fn(hyper::Request<hyper::body::Incoming>) -> HyperResponse + Send + Sync + 'static,
{
    let runtime = config.runtime()?;
    runtime.block_on(async {
        let listener = Listener::bind(&config).await?;
        println!("{}", banner(label, listener.local_addr().port()));
        listener.serve(handler).await
    })
}

/// Convert a hyper request head into our Request type
///
/// The method must be one of [`Method`], spelled exactly (`get` is
/// rejected). Headers that are not valid UTF-8 are skipped. The body is not
/// read.
pub fn from_hyper_request<B>(req: &hyper::Request<B>) -> Result<Request> {
    let method: Method = req.method().as_str().parse()?;
    let uri = req.uri();

    let mut request = Request::new(method, uri.path());
    request.query = uri.query().map(|s| s.to_string());

    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    Ok(request)
}

/// Convert our Response into a hyper Response
///
/// Invalid header names or values turn the whole response into an empty 500.
pub fn to_hyper_response(res: Response) -> HyperResponse {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Full::new(res.body)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid response head");
        let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

impl App {
    /// Turn the app into a hyper-facing handler for [`Listener::serve`]
    pub fn into_service(
        self,
    ) -> impl Fn(hyper::Request<hyper::body::Incoming>) -> HyperResponse + Send + Sync + 'static {
        move |req| self.call(&req)
    }

    /// Answer one hyper request
    ///
    /// Methods outside [`Method`] never match a route and get the fallback.
    pub fn call<B>(&self, req: &hyper::Request<B>) -> HyperResponse {
        let res = match from_hyper_request(req) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::trace!(error = %e, "unroutable request");
                Response::not_found()
            }
        };
        to_hyper_response(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;
    use http_body_util::BodyExt;

    fn hyper_get(uri: &str) -> hyper::Request<()> {
        hyper::Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-trace", "abc")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::new(3002).socket_addr().unwrap();
        assert_eq!(addr, "0.0.0.0:3002".parse().unwrap());

        let addr = ServerConfig::new(80).with_hostname("[::1]").socket_addr().unwrap();
        assert_eq!(addr, "[::1]:80".parse().unwrap());

        assert!(matches!(
            ServerConfig::new(80).with_hostname("localhost").socket_addr(),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_from_hyper_request() {
        let req = from_hyper_request(&hyper_get("/user/42?verbose=1")).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/user/42");
        assert_eq!(req.query.as_deref(), Some("verbose=1"));
        assert_eq!(req.header("X-Trace"), Some("abc"));
    }

    #[test]
    fn test_from_hyper_request_unknown_method() {
        let req = hyper::Request::builder()
            .method("PROPFIND")
            .uri("/hello")
            .body(())
            .unwrap();
        assert!(matches!(from_hyper_request(&req), Err(Error::InvalidMethod(_))));
    }

    #[test]
    fn test_lowercase_method_is_not_get() {
        let req = hyper::Request::builder()
            .method("get")
            .uri("/hello")
            .body(())
            .unwrap();
        assert!(matches!(from_hyper_request(&req), Err(Error::InvalidMethod(m)) if m == "get"));

        let app = App::new().get("/hello", |_| Response::json("{}")).unwrap();
        assert_eq!(app.call(&req).status(), 404);
    }

    #[test]
    fn test_banner() {
        assert_eq!(banner("Raw server", 3001), "Raw server running on port 3001");
        assert_eq!(
            banner("Framework server", 3002),
            "Framework server running on port 3002"
        );
    }

    #[tokio::test]
    async fn test_to_hyper_response() {
        let res = to_hyper_response(Response::json(r#"{"ok":true}"#));
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "application/json");

        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"ok":true}"#);
    }

    #[test]
    fn test_to_hyper_response_invalid_header() {
        let res = crate::ResponseBuilder::new(StatusCode::OK)
            .header("bad header", "x")
            .build();
        assert_eq!(to_hyper_response(res).status(), 500);
    }

    #[test]
    fn test_app_call() {
        let app = App::new().get("/hello", |_| Response::json("{}")).unwrap();

        assert_eq!(app.call(&hyper_get("/hello?x=1")).status(), 200);
        assert_eq!(app.call(&hyper_get("/nope")).status(), 404);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let config = ServerConfig::new(0).with_hostname("127.0.0.1");
        let first = Listener::bind(&config).await.unwrap();

        let taken = ServerConfig::new(first.local_addr().port()).with_hostname("127.0.0.1");
        assert!(matches!(Listener::bind(&taken).await, Err(Error::Io(_))));
    }
}
