//! Computed-style capture using headless Chrome

use crate::page::{snapshot_page, snapshot_script};
use crate::server::{PageServer, RunningServer};
use crate::{Result, VisionError};
use folio_compiler_inline::{CompileResult, RenderContext, Snapshot, SnapshotBackend, SnapshotRequest};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const WINDOW_HEIGHT: u32 = 1080;

/// Hands out one fresh tab per capture from a shared browser.
pub struct ChromeBackend {
    browser: Browser,
}

impl ChromeBackend {
    /// Launch headless Chrome.
    pub fn launch() -> Result<Self> {
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1280, WINDOW_HEIGHT)),
            ..Default::default()
        })
        .map_err(|e| VisionError::Browser(e.to_string()))?;

        info!("headless browser launched");
        Ok(Self { browser })
    }
}

impl SnapshotBackend for ChromeBackend {
    type Context = ChromeContext;

    fn acquire(&mut self, width_px: u32) -> CompileResult<ChromeContext> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| VisionError::Browser(e.to_string()))?;

        tab.set_bounds(headless_chrome::types::Bounds::Normal {
            left: Some(0),
            top: Some(0),
            width: Some(f64::from(width_px.max(1)) + 40.0),
            height: Some(f64::from(WINDOW_HEIGHT)),
        })
        .map_err(|e| VisionError::Browser(e.to_string()))?;

        debug!(width_px, "render context acquired");
        Ok(ChromeContext {
            tab: Some(tab),
            server: None,
        })
    }
}

/// One tab plus the page server feeding it.
pub struct ChromeContext {
    tab: Option<Arc<Tab>>,
    server: Option<RunningServer>,
}

impl ChromeContext {
    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| VisionError::Browser("tab already closed".to_string()))
    }

    fn read_snapshot(&mut self, request: &SnapshotRequest) -> Result<Snapshot> {
        let running = PageServer::new(snapshot_page(request))?.spawn();
        let url = running.url().to_string();
        self.server = Some(running);

        let tab = self.tab()?;
        tab.navigate_to(&url)
            .map_err(|e| VisionError::Browser(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| VisionError::Browser(e.to_string()))?;

        let value = tab
            .evaluate(&snapshot_script(request), false)
            .map_err(|e| VisionError::Capture(e.to_string()))?
            .value
            .ok_or_else(|| VisionError::Capture("snapshot script returned nothing".to_string()))?;

        let json = value
            .as_str()
            .ok_or_else(|| VisionError::Capture("snapshot script returned a non-string".to_string()))?;
        Ok(serde_json::from_str(json)?)
    }
}

impl RenderContext for ChromeContext {
    #[instrument(skip_all, fields(properties = request.properties.len()))]
    fn capture(&mut self, request: &SnapshotRequest) -> CompileResult<Snapshot> {
        let snapshot = self.read_snapshot(request)?;
        debug!(
            elements = snapshot.elements.len(),
            bars = snapshot.accent_bars.len(),
            "snapshot captured"
        );
        Ok(snapshot)
    }

    fn release(&mut self) -> CompileResult<()> {
        let closed = match self.tab.take() {
            Some(tab) => tab
                .close(true)
                .map(|_| ())
                .map_err(|e| VisionError::Browser(e.to_string())),
            None => Ok(()),
        };
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        closed?;
        debug!("render context released");
        Ok(())
    }
}
