//! Shared test helpers: a minimal collectd `unixsock` daemon.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use sockprobe_core::config::{CheckConfig, RawCheckConfig};

/// Catalog served by the fake daemon: identifier -> `field=value` pairs.
#[derive(Default)]
pub struct Catalog {
    entries: Vec<(String, Vec<(String, String)>)>,
    /// Announce one more `GETVAL` line than is actually sent.
    truncate_getval: bool,
    /// Announce one more `LISTVAL` line than is actually sent.
    truncate_listval: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: &str, fields: &[(&str, &str)]) -> Self {
        self.entries.push((
            identifier.to_string(),
            fields
                .iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        ));
        self
    }

    pub fn truncating_getval(mut self) -> Self {
        self.truncate_getval = true;
        self
    }

    pub fn truncating_listval(mut self) -> Self {
        self.truncate_listval = true;
        self
    }

    fn respond(&self, command: &str) -> Vec<String> {
        if command == "LISTVAL" {
            let announced = self.entries.len() + usize::from(self.truncate_listval);
            let mut lines = vec![format!("{announced} Values found")];
            lines.extend(
                self.entries
                    .iter()
                    .map(|(id, _)| format!("1700000000.000 {id}")),
            );
            return lines;
        }
        if let Some(id) = command.strip_prefix("GETVAL ") {
            return match self.entries.iter().find(|(known, _)| known == id) {
                Some((_, fields)) => {
                    let announced = fields.len() + usize::from(self.truncate_getval);
                    let mut lines = vec![format!("{announced} Values found")];
                    lines.extend(fields.iter().map(|(f, v)| format!("{f}={v}")));
                    lines
                }
                None => vec!["ERROR: Server error: No such value.".to_string()],
            };
        }
        vec![format!("-1 Unknown command: {command}")]
    }
}

/// A running fake daemon. The socket is removed when this is dropped.
pub struct Daemon {
    pub path: PathBuf,
    connections: Arc<AtomicUsize>,
    _dir: TempDir,
}

impl Daemon {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub fn spawn_daemon(catalog: Catalog) -> Daemon {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("collectd-unixsock");
    let listener = UnixListener::bind(&path).expect("bind unix socket");
    let connections = Arc::new(AtomicUsize::new(0));
    let catalog = Arc::new(catalog);

    let counter = Arc::clone(&connections);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(serve(stream, Arc::clone(&catalog)));
        }
    });

    Daemon {
        path,
        connections,
        _dir: dir,
    }
}

async fn serve(stream: UnixStream, catalog: Arc<Catalog>) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    while let Ok(Some(command)) = lines.next_line().await {
        for line in catalog.respond(command.trim()) {
            if write.write_all(format!("{line}\n").as_bytes()).await.is_err() {
                return;
            }
        }
    }
}

/// Validated config pointing at `daemon`, thresholds warning=3 critical=5.
pub fn config_for(daemon: &Daemon, metric: Option<&str>, pattern: Option<&str>) -> CheckConfig {
    raw_for(daemon, metric, pattern)
        .validate()
        .expect("valid test config")
}

/// Unvalidated form of [`config_for`], for tests that override a field.
pub fn raw_for(daemon: &Daemon, metric: Option<&str>, pattern: Option<&str>) -> RawCheckConfig {
    RawCheckConfig {
        socket: Some(daemon.path.display().to_string()),
        metric: metric.map(str::to_string),
        pattern: pattern.map(str::to_string),
        warning: Some("3".into()),
        critical: Some("5".into()),
        timeout: Some("2".into()),
        ..Default::default()
    }
}
