//! Spy engine shared by the integration tests
#![allow(dead_code)]

use htmltopdf::engine::{Engine, KillSwitch, Page, Session};
use htmltopdf::{Error, MediaType, RenderConfiguration, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n%mock\n%%EOF\n";

/// Which step of the render the mock should break
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    None,
    Launch,
    OpenPage,
    Navigate,
    /// Block navigation for this long, ignoring the timeout, unless the
    /// session is killed first
    Stall(Duration),
    Export,
    EmptyExport,
    Terminate,
}

/// Everything the engine saw during a render
#[derive(Debug, Default)]
pub struct Spy {
    pub launched: usize,
    pub terminated: usize,
    /// Out-of-band kills; each also counts as a termination
    pub killed: usize,
    pub pages_opened: usize,
    pub urls: Vec<String>,
    /// Whether the navigated file existed and its bytes at navigation time
    pub staged_contents: Vec<Option<Vec<u8>>>,
    pub media: Vec<MediaType>,
    pub configs: Vec<RenderConfiguration>,
}

#[derive(Clone)]
pub struct MockEngine {
    pub spy: Arc<Mutex<Spy>>,
    fault: Fault,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::failing(Fault::None)
    }

    pub fn failing(fault: Fault) -> Self {
        Self { spy: Arc::new(Mutex::new(Spy::default())), fault }
    }

    pub fn launched(&self) -> usize {
        self.spy.lock().unwrap().launched
    }

    pub fn terminated(&self) -> usize {
        self.spy.lock().unwrap().terminated
    }

    pub fn killed(&self) -> usize {
        self.spy.lock().unwrap().killed
    }

    pub fn last_config(&self) -> Option<RenderConfiguration> {
        self.spy.lock().unwrap().configs.last().cloned()
    }
}

impl Engine for MockEngine {
    type Session = MockSession;

    fn launch(&self) -> Result<MockSession> {
        if self.fault == Fault::Launch {
            return Err(Error::InitializationError("mock launch failure".into()));
        }
        self.spy.lock().unwrap().launched += 1;
        Ok(MockSession { spy: self.spy.clone(), fault: self.fault })
    }
}

pub struct MockSession {
    spy: Arc<Mutex<Spy>>,
    fault: Fault,
}

impl Session for MockSession {
    type Page = MockPage;
    type KillSwitch = MockKillSwitch;

    fn kill_switch(&self) -> MockKillSwitch {
        MockKillSwitch { spy: self.spy.clone() }
    }

    fn open_page(&mut self) -> Result<MockPage> {
        if self.fault == Fault::OpenPage {
            return Err(Error::InitializationError("mock page failure".into()));
        }
        self.spy.lock().unwrap().pages_opened += 1;
        Ok(MockPage { spy: self.spy.clone(), fault: self.fault })
    }

    fn terminate(self) -> Result<()> {
        self.spy.lock().unwrap().terminated += 1;
        if self.fault == Fault::Terminate {
            return Err(Error::Other("mock terminate failure".into()));
        }
        Ok(())
    }
}

pub struct MockKillSwitch {
    spy: Arc<Mutex<Spy>>,
}

impl KillSwitch for MockKillSwitch {
    fn kill(&self) -> Result<()> {
        let mut spy = self.spy.lock().unwrap();
        spy.killed += 1;
        spy.terminated += 1;
        Ok(())
    }
}

pub struct MockPage {
    spy: Arc<Mutex<Spy>>,
    fault: Fault,
}

impl Page for MockPage {
    fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        let staged = url::Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .and_then(|p: PathBuf| std::fs::read(p).ok());
        {
            let mut spy = self.spy.lock().unwrap();
            spy.urls.push(url.to_string());
            spy.staged_contents.push(staged);
        }

        match self.fault {
            Fault::Navigate => Err(Error::LoadError("mock navigation failure".into())),
            Fault::Stall(d) => {
                let deadline = Instant::now() + d;
                while Instant::now() < deadline {
                    if self.spy.lock().unwrap().killed > 0 {
                        return Err(Error::LoadError("mock browser was killed".into()));
                    }
                    std::thread::sleep(Duration::from_millis(5));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn set_media_emulation(&mut self, media: MediaType) -> Result<()> {
        self.spy.lock().unwrap().media.push(media);
        Ok(())
    }

    fn export_pdf(&mut self, config: &RenderConfiguration) -> Result<Vec<u8>> {
        self.spy.lock().unwrap().configs.push(config.clone());
        match self.fault {
            Fault::Export => Err(Error::RenderError("mock export failure".into())),
            Fault::EmptyExport => Ok(Vec::new()),
            _ => Ok(FAKE_PDF.to_vec()),
        }
    }
}
