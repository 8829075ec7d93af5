//! Page navigation — a bounded counter over the three dashboard pages.
//!
//! `previous` and `next` saturate at the ends instead of wrapping.  The raw
//! number is kept (rather than only the [`Page`] enum) so that a corrupted
//! value surfaces as a [`NavigationError`] at render time instead of being
//! papered over with a fallback page.

use thiserror::Error;

pub const FIRST_PAGE: u8 = 1;
pub const LAST_PAGE: u8 = 3;

/// The three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    DetailedAnalysis,
    AdditionalInsights,
}

impl Page {
    pub const ALL: &[Page] = &[Page::Overview, Page::DetailedAnalysis, Page::AdditionalInsights];

    pub fn number(self) -> u8 {
        match self {
            Page::Overview => 1,
            Page::DetailedAnalysis => 2,
            Page::AdditionalInsights => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::DetailedAnalysis => "Detailed Analysis",
            Page::AdditionalInsights => "Additional Insights",
        }
    }
}

impl TryFrom<u8> for Page {
    type Error = NavigationError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Page::Overview),
            2 => Ok(Page::DetailedAnalysis),
            3 => Ok(Page::AdditionalInsights),
            other => Err(NavigationError::InvalidPage(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("There has been an error with the page navigation (page {0}).")]
    InvalidPage(u8),
}

/// Current page of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u8,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: FIRST_PAGE,
        }
    }
}

impl PageState {
    /// Start on a specific page.
    pub fn at(page: Page) -> Self {
        Self {
            current: page.number(),
        }
    }

    pub fn number(&self) -> u8 {
        self.current
    }

    /// Resolve the current number to a page.
    pub fn page(&self) -> Result<Page, NavigationError> {
        Page::try_from(self.current)
    }

    pub fn previous(&mut self) {
        if self.current > FIRST_PAGE {
            self.current -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.current < LAST_PAGE {
            self.current += 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt(n: u8) -> Self {
        Self { current: n }
    }
}
