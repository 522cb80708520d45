// src/fetcher.rs
use crate::error::PipelineError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const POPUP_TIMEOUT: Duration = Duration::from_secs(2);
const POPUP_CLOSE_WAIT: Duration = Duration::from_secs(1);
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// URL patterns for sub-resources that never affect the extracted text.
/// Images, stylesheets, fonts and media are blocked for speed; documents
/// and scripts still load.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.otf", "*.mp3", "*.mp4", "*.webm", "*.avi",
];

/// One way to dismiss a consent or privacy popup: either a CSS selector or
/// a visible button label matched case-insensitively.
#[derive(Debug)]
pub enum PopupMatcher {
    Css(&'static str),
    ButtonText(&'static str),
}

/// Ordered best-effort dismissal table. Accept-style buttons come first,
/// generic close buttons after, decline last.
pub const POPUP_DISMISSERS: &[PopupMatcher] = &[
    PopupMatcher::Css(r#"button[id*="accept"]"#),
    PopupMatcher::Css(r#"button[class*="accept"]"#),
    PopupMatcher::Css(r#"button[aria-label*="accept"]"#),
    PopupMatcher::ButtonText("Accept"),
    PopupMatcher::ButtonText("Accept All"),
    PopupMatcher::ButtonText("Accept Cookies"),
    PopupMatcher::ButtonText("OK"),
    PopupMatcher::ButtonText("Got it"),
    PopupMatcher::ButtonText("I Agree"),
    PopupMatcher::ButtonText("Continue"),
    PopupMatcher::Css(r#"button[aria-label*="close"]"#),
    PopupMatcher::Css(r#"button[class*="close"]"#),
    PopupMatcher::Css(r#"[class*="modal"] button"#),
    PopupMatcher::Css(r#"[class*="popup"] button"#),
    PopupMatcher::Css(".cookie-banner button"),
    PopupMatcher::Css("#cookie-banner button"),
    PopupMatcher::ButtonText("Privacy Policy"),
    PopupMatcher::ButtonText("Decline"),
];

/// Renders a URL in an isolated headless Chromium session and returns the
/// final HTML. Rendering-only failures degrade to an empty string; only a
/// failure to launch the browser itself is an error.
pub struct PageFetcher {
    navigation_timeout: Duration,
    popup_timeout: Duration,
    settle_delay: Duration,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    pub fn new() -> Self {
        Self {
            navigation_timeout: NAVIGATION_TIMEOUT,
            popup_timeout: POPUP_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Fetch the rendered markup for a job page.
    ///
    /// A fresh browser session is launched per call and torn down on every
    /// exit path; nothing is shared across requests.
    pub async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        info!("Fetching dynamic content for: {}", url);

        let config = BrowserConfig::builder()
            .arg(format!("--user-agent={USER_AGENT}"))
            .build()
            .map_err(PipelineError::FetchTransport)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PipelineError::FetchTransport(e.to_string()))?;

        // The handler future drives all CDP traffic and must be polled for
        // the lifetime of the session.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let html = self.render(&browser, url).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), browser.wait()).await;
        driver.abort();

        Ok(html)
    }

    /// Best-effort render: navigation and content errors never propagate,
    /// they degrade to whatever markup can still be read (or nothing).
    async fn render(&self, browser: &Browser, url: &str) -> String {
        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to open browser page: {}", e);
                return String::new();
            }
        };

        if let Err(e) = page
            .execute(SetBlockedUrLsParams::new(
                BLOCKED_URL_PATTERNS
                    .iter()
                    .map(|pattern| pattern.to_string())
                    .collect::<Vec<_>>(),
            ))
            .await
        {
            warn!("Failed to install resource blocklist: {}", e);
        }

        match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => {
                self.dismiss_popups(&page).await;
                tokio::time::sleep(self.settle_delay).await;
            }
            Ok(Err(e)) => warn!("Navigation failed for {}: {}", url, e),
            Err(_) => warn!("Navigation timed out for {}", url),
        }

        match page.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read page content for {}: {}", url, e);
                String::new()
            }
        }
    }

    /// Walk the dismissal table until one matcher clicks something.
    /// Exhausting the table without a hit is not an error.
    async fn dismiss_popups(&self, page: &Page) {
        for matcher in POPUP_DISMISSERS {
            let clicked = tokio::time::timeout(self.popup_timeout, try_dismiss(page, matcher))
                .await
                .unwrap_or(false);
            if clicked {
                info!("Dismissed popup via {:?}", matcher);
                tokio::time::sleep(POPUP_CLOSE_WAIT).await;
                break;
            }
        }
    }
}

async fn try_dismiss(page: &Page, matcher: &PopupMatcher) -> bool {
    match matcher {
        PopupMatcher::Css(selector) => match page.find_element(*selector).await {
            Ok(element) => element.click().await.is_ok(),
            Err(_) => false,
        },
        PopupMatcher::ButtonText(label) => {
            let Ok(buttons) = page.find_elements("button").await else {
                return false;
            };
            let needle = label.to_lowercase();
            for button in buttons {
                if let Ok(Some(text)) = button.inner_text().await {
                    if text.to_lowercase().contains(&needle) {
                        return button.click().await.is_ok();
                    }
                }
            }
            false
        }
    }
}
