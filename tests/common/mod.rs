//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use feature_service::config::ServiceConfig;
use feature_service::lifecycle::{self, Shutdown};

pub const DOMAINS_TSV: &str = concat!(
    "G1\tT2\tP2\tprotein_coding\tQ1\t42\tNM_2\tdesc\t7\t100\t900\tGENE1\t",
    "PF2\tfam\tIPR9\tZinc finger\tZinc finger domain\t3\t30\n",
    "G1\tT1\tP1\tprotein_coding\tQ1\t42\tNM_1\tdesc\t7\t100\t900\tGENE1\t",
    "PF1\tfam\tIPR1\tKinase\tKinase domain\t10\t50\n",
);

pub const VARIANTS_TSV: &str = concat!(
    "COSM1\tCOSMIC\t7\t1000\t1000\tG1\tT2\t1\tsomatic_snv\tmissense_variant\t",
    "A/G\t20\t20\tK/E\t5\t5\t13\t13\t\tbenign\t0.1\ttolerated\t0.9\n",
    "COSM2\tCOSMIC\t7\t1010\t1010\tG1\tT2\t1\tsomatic_snv\tmissense_variant\t",
    "A/G\t30\t30\tK/E\t9\t7\t23\t23\t\tbenign\t0.1\ttolerated\t0.9\n",
    "COSM3\tCOSMIC\t7\t1020\t1020\tG1\tT1\t1\tsomatic_snv\tmissense_variant\t",
    "A/G\t40\t40\tK/E\t8\t8\t33\t33\t\tbenign\t0.1\ttolerated\t0.9\n",
);

pub const PROTEINS_JSON: &str = r#"[{"id":"P1","seq":"MKVLA"},{"id":"P2","seq":"MA"}]"#;
pub const CDS_JSON: &str =
    r#"[{"id":"T1","seq":"ATGAAAGTTCTGGCCTAA"},{"id":"T2","seq":"ATGGCCTGA"}]"#;

/// Answer Ensembl REST and BioMart requests with the fixtures above.
pub fn fixture_upstream(target: &str) -> (u16, String) {
    if target.starts_with("/biomart/martservice") {
        if target.contains("hsapiens_snp_som") {
            (200, VARIANTS_TSV.to_string())
        } else {
            (200, DOMAINS_TSV.to_string())
        }
    } else if target.starts_with("/sequence/id/") {
        if target.contains("type=cds") {
            (200, CDS_JSON.to_string())
        } else {
            (200, PROTEINS_JSON.to_string())
        }
    } else {
        (404, String::new())
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` maps the request target (path and query) to a status and body.
pub async fn start_programmable_upstream<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(target) = read_target(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(&target);
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read the request head and return the target of its request line.
async fn read_target(socket: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

/// Config pointing every upstream at `upstream`, listening on an ephemeral port.
pub fn config_for(upstream: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.ensembl_rest_url = format!("http://{upstream}");
    config.biomart.url = format!("http://{upstream}/biomart/martservice");
    config.upstream.fetch_timeout_secs = 5;
    config
}

/// A running service and its shutdown handle.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
}

impl TestService {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

/// Start the service with `config` in the background.
pub async fn start_service(config: ServiceConfig) -> TestService {
    let started = lifecycle::start(config).await.unwrap();
    let addr = started.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        let _ = started.server.run(started.listener, rx).await;
        if let Some(cache) = started.cache {
            let _ = cache.save_to_file();
        }
    });

    TestService {
        addr,
        shutdown,
        handle,
    }
}
