use crate::config::{MediaType, RenderConfiguration};
use crate::engine::{Engine, KillSwitch, Page as _, Session};
use crate::{Error, Result};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

enum Command {
    OpenPage(oneshot::Sender<Result<()>>),
    Goto(String, Duration, oneshot::Sender<Result<()>>),
    EmulateMedia(MediaType, oneshot::Sender<Result<()>>),
    Pdf(Box<RenderConfiguration>, oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly browser session backed by a dedicated worker thread.
///
/// The worker thread owns the engine's session and page and executes commands
/// sent from async tasks, so engines need not be `Send` past launch. The
/// session is terminated when [`Browser::close`] is called or, failing that,
/// once the browser and every page handle have been dropped. When a page call
/// is stuck, [`Browser::abort`] ends the process without waiting for it.
pub struct Browser {
    cmd_tx: Sender<Command>,
    kill_switch: Box<dyn KillSwitch>,
    killed: Arc<AtomicBool>,
}

/// A handle to the page opened inside a [`Browser`].
#[derive(Clone)]
pub struct Page {
    cmd_tx: Sender<Command>,
}

impl Browser {
    /// Launch a browser with `engine` on a new worker thread.
    pub async fn launch<E: Engine>(engine: E) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<Box<dyn KillSwitch>>>();
        let killed = Arc::new(AtomicBool::new(false));
        let worker_killed = killed.clone();

        thread::Builder::new()
            .name("htmltopdf-browser".into())
            .spawn(move || {
                // Launch on the worker thread so the session never crosses threads
                let session = match engine.launch() {
                    Ok(s) => s,
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                };
                let kill_switch: Box<dyn KillSwitch> = Box::new(session.kill_switch());
                let _ = init_tx.send(Ok(kill_switch));
                run_worker(session, cmd_rx, &worker_killed);
            })?;

        let kill_switch = init_rx
            .await
            .map_err(|e| Error::InitializationError(format!("Worker init canceled: {}", e)))??;

        debug!("browser session launched");
        Ok(Self { cmd_tx, kill_switch, killed })
    }

    /// Open the session's page.
    pub async fn new_page(&self) -> Result<Page> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::OpenPage(tx));
        rx.await
            .map_err(|e| Error::Other(format!("OpenPage canceled: {}", e)))??;
        Ok(Page { cmd_tx: self.cmd_tx.clone() })
    }

    /// Terminate the browser process and stop the worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }

    /// Kill the browser process immediately, without queueing behind a page
    /// call that may never return. The worker exits once that call unwinds.
    pub fn abort(self) -> Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        let res = self.kill_switch.kill();
        let (tx, _rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        debug!("browser session killed");
        res
    }
}

impl Page {
    /// Navigate to a URL and wait for network idle, bounded by `timeout`.
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Goto(url.to_string(), timeout, tx));
        rx.await
            .map_err(|e| Error::Other(format!("Goto canceled: {}", e)))?
    }

    pub async fn emulate_media(&self, media: MediaType) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::EmulateMedia(media, tx));
        rx.await
            .map_err(|e| Error::Other(format!("EmulateMedia canceled: {}", e)))?
    }

    /// Export the page as PDF using `config`.
    pub async fn pdf(&self, config: &RenderConfiguration) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Pdf(Box::new(config.clone()), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Pdf canceled: {}", e)))?
    }
}

fn run_worker<S: Session>(mut session: S, cmd_rx: Receiver<Command>, killed: &AtomicBool) {
    let mut page: Option<S::Page> = None;
    let mut close_reply = None;

    // Command loop; ends on Close or when every handle is gone
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            Command::OpenPage(resp) => {
                let res = session.open_page().map(|p| {
                    page = Some(p);
                });
                let _ = resp.send(res);
            }
            Command::Goto(url, timeout, resp) => {
                let res = match page.as_mut() {
                    Some(p) => p.navigate(&url, timeout),
                    None => Err(no_page()),
                };
                let _ = resp.send(res);
            }
            Command::EmulateMedia(media, resp) => {
                let res = match page.as_mut() {
                    Some(p) => p.set_media_emulation(media),
                    None => Err(no_page()),
                };
                let _ = resp.send(res);
            }
            Command::Pdf(config, resp) => {
                let res = match page.as_mut() {
                    Some(p) => p.export_pdf(&config),
                    None => Err(no_page()),
                };
                let _ = resp.send(res);
            }
            Command::Close(resp) => {
                close_reply = Some(resp);
                break;
            }
        }
    }

    drop(page);
    // A killed process must not be terminated a second time
    if killed.load(Ordering::SeqCst) {
        drop(session);
        return;
    }
    let res = session.terminate();
    match close_reply {
        Some(resp) => {
            let _ = resp.send(res);
        }
        None => {
            if let Err(e) = res {
                warn!("browser teardown after dropped handle failed: {}", e);
            }
        }
    }
    debug!("browser session terminated");
}

fn no_page() -> Error {
    Error::Other("no page is open in this browser".into())
}
