//! Per-mode UI state shared by one uploaded image.
//!
//! Each mode owns an [`AnalysisState`] and a generation number. Starting a
//! run or selecting a new image bumps the generation, so a response that
//! arrives for an older generation is dropped instead of overwriting newer
//! state.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::client::{Analyzer, ClientError};
use crate::encoder::UploadedImage;
use crate::messages::{Locale, ModeView};
use crate::mode::AnalysisMode;
use crate::result::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(AnalysisResult),
    Failed(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one in-flight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mode: AnalysisMode,
    generation: u64,
}

#[derive(Debug, Default)]
struct ModeSlot {
    state: AnalysisState,
    generation: u64,
}

#[derive(Debug)]
pub struct Session {
    locale: Locale,
    image: Option<Arc<UploadedImage>>,
    active: AnalysisMode,
    slots: HashMap<AnalysisMode, ModeSlot>,
}

impl Session {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            image: None,
            active: AnalysisMode::Physiognomy,
            slots: AnalysisMode::ALL
                .into_iter()
                .map(|mode| (mode, ModeSlot::default()))
                .collect(),
        }
    }

    /// Replaces the image and returns every mode to idle.
    pub fn select_image(&mut self, image: UploadedImage) {
        self.image = Some(Arc::new(image));
        self.reset_all();
    }

    pub fn active(&self) -> AnalysisMode {
        self.active
    }

    /// Only changes which state is shown; in-flight runs keep going.
    pub fn set_active(&mut self, mode: AnalysisMode) {
        self.active = mode;
    }

    pub fn state(&self, mode: AnalysisMode) -> &AnalysisState {
        &self.slot(mode).state
    }

    pub fn current(&self) -> &AnalysisState {
        self.state(self.active)
    }

    pub fn view(&self) -> ModeView {
        self.locale.mode_view(self.active)
    }

    /// Moves `mode` to loading. Without an image the mode fails right away
    /// and no ticket is issued.
    pub fn begin(&mut self, mode: AnalysisMode) -> Option<(Ticket, Arc<UploadedImage>)> {
        let Some(image) = self.image.clone() else {
            let message = self.locale.upload_first().to_string();
            self.slot_mut(mode).state = AnalysisState::Failed(message);
            return None;
        };

        let slot = self.slot_mut(mode);
        slot.generation += 1;
        slot.state = AnalysisState::Loading;
        let ticket = Ticket {
            mode,
            generation: slot.generation,
        };
        debug!(%mode, generation = ticket.generation, "analysis started");
        Some((ticket, image))
    }

    /// Applies a finished run. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, ClientError>,
    ) -> bool {
        let slot = self.slot_mut(ticket.mode);
        if slot.generation != ticket.generation {
            debug!(
                mode = %ticket.mode,
                stale = ticket.generation,
                current = slot.generation,
                "dropping stale analysis result"
            );
            return false;
        }

        slot.state = match outcome {
            Ok(result) => AnalysisState::Success(result),
            Err(err) => AnalysisState::Failed(err.message().to_string()),
        };
        true
    }

    /// Runs one analysis to completion.
    pub async fn run(&mut self, mode: AnalysisMode, analyzer: &dyn Analyzer) -> &AnalysisState {
        if let Some((ticket, image)) = self.begin(mode) {
            let outcome = analyzer.analyze(&image, mode).await;
            self.complete(ticket, outcome);
        }
        self.state(mode)
    }

    fn reset_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.generation += 1;
            slot.state = AnalysisState::Idle;
        }
    }

    fn slot(&self, mode: AnalysisMode) -> &ModeSlot {
        &self.slots[&mode]
    }

    fn slot_mut(&mut self, mode: AnalysisMode) -> &mut ModeSlot {
        self.slots.entry(mode).or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::result::parse_narrative;

    #[derive(Default)]
    struct CountingAnalyzer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Analyzer for CountingAnalyzer {
        async fn analyze(
            &self,
            _image: &UploadedImage,
            mode: AnalysisMode,
        ) -> Result<AnalysisResult, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match mode {
                AnalysisMode::Physiognomy => {
                    Ok(AnalysisResult::Narrative(parse_narrative("**총평**")))
                }
                _ => Err(ClientError::Server {
                    message: "분석 중 오류가 발생했습니다: boom".to_string(),
                    status: 500,
                }),
            }
        }
    }

    fn image() -> UploadedImage {
        UploadedImage::from_bytes(&[1, 2, 3], "image/jpeg")
    }

    #[tokio::test]
    async fn no_image_fails_without_network_call() {
        let analyzer = CountingAnalyzer::default();
        let mut session = Session::new(Locale::Ko);

        for mode in AnalysisMode::ALL {
            let state = session.run(mode, &analyzer).await;
            assert_eq!(state.error(), Some("먼저 사진을 업로드해주세요."));
        }
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn new_image_resets_every_mode() {
        let analyzer = CountingAnalyzer::default();
        let mut session = Session::new(Locale::Ko);
        session.select_image(image());

        session.run(AnalysisMode::Physiognomy, &analyzer).await;
        session.run(AnalysisMode::Celebrity, &analyzer).await;
        assert!(session.state(AnalysisMode::Physiognomy).result().is_some());
        assert!(session.state(AnalysisMode::Celebrity).error().unwrap().contains("boom"));

        session.set_active(AnalysisMode::Celebrity);
        session.select_image(image());
        for mode in AnalysisMode::ALL {
            assert_eq!(session.state(mode), &AnalysisState::Idle);
        }
        assert_eq!(session.active(), AnalysisMode::Celebrity);
    }

    #[test]
    fn begin_clears_previous_outcome() {
        let mut session = Session::new(Locale::En);
        session.select_image(image());

        let (ticket, _) = session.begin(AnalysisMode::Soulmate).unwrap();
        session.complete(
            ticket,
            Err(ClientError::Server {
                message: "nope".to_string(),
                status: 500,
            }),
        );
        assert_eq!(session.state(AnalysisMode::Soulmate).error(), Some("nope"));

        session.begin(AnalysisMode::Soulmate).unwrap();
        let state = session.state(AnalysisMode::Soulmate);
        assert!(state.is_loading());
        assert!(state.error().is_none() && state.result().is_none());
    }

    #[test]
    fn stale_result_after_new_image_is_dropped() {
        let mut session = Session::new(Locale::En);
        session.select_image(image());
        let (ticket, _) = session.begin(AnalysisMode::Physiognomy).unwrap();

        session.select_image(image());
        let applied = session.complete(
            ticket,
            Ok(AnalysisResult::Narrative(parse_narrative("old"))),
        );

        assert!(!applied);
        assert_eq!(session.state(AnalysisMode::Physiognomy), &AnalysisState::Idle);
    }

    #[test]
    fn only_latest_run_per_mode_lands() {
        let mut session = Session::new(Locale::En);
        session.select_image(image());
        let (first, _) = session.begin(AnalysisMode::Physiognomy).unwrap();
        let (second, _) = session.begin(AnalysisMode::Physiognomy).unwrap();

        assert!(session.complete(second, Ok(AnalysisResult::Narrative(parse_narrative("new")))));
        assert!(!session.complete(first, Ok(AnalysisResult::Narrative(parse_narrative("old")))));
        assert_eq!(
            session.state(AnalysisMode::Physiognomy).result(),
            Some(&AnalysisResult::Narrative(parse_narrative("new")))
        );
    }

    #[test]
    fn switching_tabs_keeps_other_modes_updating() {
        let mut session = Session::new(Locale::En);
        session.select_image(image());
        let (ticket, _) = session.begin(AnalysisMode::Celebrity).unwrap();

        session.set_active(AnalysisMode::Soulmate);
        assert!(session.complete(ticket, Ok(AnalysisResult::Narrative(parse_narrative("x")))));
        assert!(session.state(AnalysisMode::Celebrity).result().is_some());
        assert_eq!(session.current(), &AnalysisState::Idle);
        assert_eq!(session.view().header_title, "Find Your Soulmate");
    }
}
