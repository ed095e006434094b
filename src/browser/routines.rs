use super::{BrowserError, LivePage, Routine};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use std::time::Duration;

/// How an infinite scroll ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Page height stopped changing after `steps` scroll cycles
    Settled { steps: usize },
    /// Height was still growing when the step cap was reached
    GaveUp { steps: usize },
}

/// Scrolls to the bottom of a page until lazily loaded content stops appearing
#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    step_px: u32,
    delay: Duration,
    max_steps: usize,
}

impl InfiniteScroll {
    /// A cap of zero is raised to one: the page is always scrolled at least once.
    pub fn new(step_px: u32, delay: Duration, max_steps: usize) -> Self {
        Self {
            step_px,
            delay,
            max_steps: max_steps.max(1),
        }
    }

    pub fn from_config(config: &BrowserConfig) -> Self {
        Self::new(
            config.scroll_step_px,
            config.scroll_delay(),
            config.max_scroll_steps,
        )
    }

    /// Scroll, wait and re-measure until two consecutive heights match or
    /// `max_steps` cycles have run.
    pub async fn scroll(&self, page: &dyn LivePage) -> Result<ScrollOutcome, BrowserError> {
        let mut last_height = page.scroll_height().await?;

        for step in 1..=self.max_steps {
            page.scroll_by(self.step_px).await?;
            tokio::time::sleep(self.delay).await;

            let new_height = page.scroll_height().await?;
            if new_height == last_height {
                return Ok(ScrollOutcome::Settled { steps: step });
            }
            ::log::trace!(
                "Scroll step {}: height {} -> {}",
                step,
                last_height,
                new_height
            );
            last_height = new_height;
        }

        Ok(ScrollOutcome::GaveUp {
            steps: self.max_steps,
        })
    }
}

impl Default for InfiniteScroll {
    fn default() -> Self {
        Self::from_config(&BrowserConfig::default())
    }
}

#[async_trait]
impl Routine for InfiniteScroll {
    fn name(&self) -> &'static str {
        "infinite-scroll"
    }

    async fn run(&self, page: &dyn LivePage) -> Result<(), BrowserError> {
        match self.scroll(page).await? {
            ScrollOutcome::Settled { steps } => {
                ::log::debug!("Infinite scroll settled after {} steps", steps);
            }
            ScrollOutcome::GaveUp { steps } => {
                ::log::warn!(
                    "Infinite scroll gave up after {} steps with the page still growing",
                    steps
                );
            }
        }
        Ok(())
    }
}
