//! Selection state and the transition rules that keep it consistent

use log::warn;

use crate::error::StudioError;
use crate::models::{
    BackgroundMode, Gender, GenerationInputs, GenerationParameters, ModelTier, SlotKey,
    UploadedImage,
};
use crate::poses;

/// Upper bound on simultaneously selected poses
pub const MAX_SELECTED_POSES: usize = 3;

/// Lifecycle phase of the generate flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Validating,
    Generating,
    Succeeded,
    Failed,
}

/// All user-adjustable studio state.
///
/// Fields are private and every write goes through a named transition, so the
/// invariants hold at all times: selected poses are non-empty, unique, capped
/// at [`MAX_SELECTED_POSES`] and valid for the current gender.
#[derive(Debug, Clone)]
pub struct AppState {
    gender: Gender,
    background_mode: BackgroundMode,
    model: ModelTier,
    selected_pose_ids: Vec<String>,
    inputs: GenerationInputs,
    phase: GenerationPhase,
    error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            background_mode: BackgroundMode::White,
            model: ModelTier::Pro,
            selected_pose_ids: vec![poses::default_pose(Gender::Female).id.to_string()],
            inputs: GenerationInputs::default(),
            phase: GenerationPhase::Idle,
            error: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn background_mode(&self) -> BackgroundMode {
        self.background_mode
    }

    pub fn model(&self) -> ModelTier {
        self.model
    }

    /// Selection order is preserved; outputs of a batch align with it
    pub fn selected_pose_ids(&self) -> &[String] {
        &self.selected_pose_ids
    }

    pub fn inputs(&self) -> &GenerationInputs {
        &self.inputs
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        self.phase == GenerationPhase::Generating
    }

    /// Failure message of the last batch, until the next mutation clears it
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Snapshot of the parameters a batch would run with right now
    pub fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            gender: self.gender,
            background_mode: self.background_mode,
            model: self.model,
            pose_ids: self.selected_pose_ids.clone(),
        }
    }

    /// Switches gender and drops selected poses that are not in the new
    /// catalog, keeping the survivors' order. An emptied selection falls back
    /// to the catalog's first pose.
    pub fn set_gender(&mut self, gender: Gender) {
        self.settle_outcome();
        if self.gender == gender {
            return;
        }
        self.gender = gender;
        self.selected_pose_ids
            .retain(|id| poses::is_valid_pose(gender, id));
        if self.selected_pose_ids.is_empty() {
            self.selected_pose_ids
                .push(poses::default_pose(gender).id.to_string());
        }
    }

    /// Adds or removes one pose. Removing the last selected pose and adding
    /// past the cap are both ignored rather than treated as errors.
    pub fn toggle_pose(&mut self, pose_id: &str) {
        self.settle_outcome();
        if let Some(position) = self.selected_pose_ids.iter().position(|id| id == pose_id) {
            if self.selected_pose_ids.len() > 1 {
                self.selected_pose_ids.remove(position);
            }
            return;
        }
        if self.selected_pose_ids.len() >= MAX_SELECTED_POSES {
            return;
        }
        if !poses::is_valid_pose(self.gender, pose_id) {
            warn!(
                "[toggle_pose] ignoring {}, not in the {} catalog",
                pose_id,
                self.gender.as_str()
            );
            return;
        }
        self.selected_pose_ids.push(pose_id.to_string());
    }

    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.settle_outcome();
        self.background_mode = mode;
    }

    pub fn set_model(&mut self, model: ModelTier) {
        self.settle_outcome();
        self.model = model;
    }

    /// Binds an image to a slot, replacing any previous occupant
    pub fn set_slot(&mut self, slot: SlotKey, image: UploadedImage) {
        self.settle_outcome();
        self.inputs.set(slot, Some(image));
    }

    pub fn clear_slot(&mut self, slot: SlotKey) {
        self.settle_outcome();
        self.inputs.set(slot, None);
    }

    /// Checks everything that must hold before a batch may be dispatched
    pub fn validate_required_inputs(&self) -> Result<(), StudioError> {
        if self.inputs.styling_ref.is_none() || self.inputs.face_ref.is_none() {
            return Err(StudioError::Validation(
                "Please upload Styling Reference and Face Reference.".to_string(),
            ));
        }
        if self.selected_pose_ids.is_empty() {
            return Err(StudioError::Validation(
                "Please select at least one pose.".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn begin_validation(&mut self) {
        self.phase = GenerationPhase::Validating;
        self.error = None;
    }

    pub(crate) fn begin_generation(&mut self) {
        self.phase = GenerationPhase::Generating;
    }

    pub(crate) fn finish_success(&mut self) {
        self.phase = GenerationPhase::Succeeded;
    }

    pub(crate) fn finish_failure(&mut self, message: String) {
        self.phase = GenerationPhase::Failed;
        self.error = Some(message);
    }

    /// Terminal outcomes fold back to idle on the next user mutation
    fn settle_outcome(&mut self) {
        if matches!(
            self.phase,
            GenerationPhase::Succeeded | GenerationPhase::Failed
        ) {
            self.phase = GenerationPhase::Idle;
            self.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_image(tag: &str) -> UploadedImage {
        UploadedImage {
            raw_bytes: Vec::new(),
            preview_handle: format!("data:image/png;base64,{}", tag),
            encoded_payload: tag.to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn fresh_state_has_expected_defaults() {
        let state = AppState::new();
        assert_eq!(state.gender(), Gender::Female);
        assert_eq!(state.background_mode(), BackgroundMode::White);
        assert_eq!(state.model(), ModelTier::Pro);
        assert_eq!(state.selected_pose_ids(), ["F1"]);
        assert_eq!(state.phase(), GenerationPhase::Idle);
        assert!(state.error().is_none());
    }

    #[test]
    fn toggle_adds_and_removes_preserving_order() {
        let mut state = AppState::new();
        state.toggle_pose("F3");
        state.toggle_pose("F7");
        assert_eq!(state.selected_pose_ids(), ["F1", "F3", "F7"]);

        state.toggle_pose("F3");
        assert_eq!(state.selected_pose_ids(), ["F1", "F7"]);
    }

    #[test]
    fn removing_the_last_pose_is_ignored() {
        let mut state = AppState::new();
        state.toggle_pose("F1");
        assert_eq!(state.selected_pose_ids(), ["F1"]);
    }

    #[test]
    fn adding_past_the_cap_is_ignored() {
        let mut state = AppState::new();
        state.toggle_pose("F2");
        state.toggle_pose("F3");
        state.toggle_pose("F4");
        assert_eq!(state.selected_pose_ids(), ["F1", "F2", "F3"]);
    }

    #[test]
    fn toggling_a_pose_from_the_wrong_catalog_is_ignored() {
        let mut state = AppState::new();
        state.toggle_pose("M1");
        state.toggle_pose("nonsense");
        assert_eq!(state.selected_pose_ids(), ["F1"]);
    }

    #[test]
    fn gender_switch_replaces_invalid_selection_with_default() {
        let mut state = AppState::new();
        state.toggle_pose("F4");
        state.toggle_pose("F9");

        state.set_gender(Gender::Male);
        assert_eq!(state.selected_pose_ids(), ["M1"]);

        state.toggle_pose("M6");
        state.set_gender(Gender::Female);
        assert_eq!(state.selected_pose_ids(), ["F1"]);
    }

    #[test]
    fn same_gender_switch_keeps_selection() {
        let mut state = AppState::new();
        state.toggle_pose("F5");
        state.set_gender(Gender::Female);
        assert_eq!(state.selected_pose_ids(), ["F1", "F5"]);
    }

    #[test]
    fn gender_switch_leaves_other_settings_alone() {
        let mut state = AppState::new();
        state.set_background_mode(BackgroundMode::KeepOriginal);
        state.set_model(ModelTier::Flash);
        state.set_slot(SlotKey::FaceRef, stub_image("face"));

        state.set_gender(Gender::Male);
        assert_eq!(state.background_mode(), BackgroundMode::KeepOriginal);
        assert_eq!(state.model(), ModelTier::Flash);
        assert!(state.inputs().face_ref.is_some());
    }

    #[test]
    fn slot_replacement_is_whole_and_independent() {
        let mut state = AppState::new();
        state.set_slot(SlotKey::StylingRef, stub_image("one"));
        state.set_slot(SlotKey::FaceRef, stub_image("face"));

        state.set_slot(SlotKey::StylingRef, stub_image("two"));
        assert_eq!(
            state.inputs().styling_ref.as_ref().unwrap().encoded_payload,
            "two"
        );
        assert_eq!(
            state.inputs().face_ref.as_ref().unwrap().encoded_payload,
            "face"
        );

        state.clear_slot(SlotKey::StylingRef);
        assert!(state.inputs().styling_ref.is_none());
        assert!(state.inputs().face_ref.is_some());
    }

    #[test]
    fn terminal_success_folds_to_idle_on_next_mutation() {
        let mut state = AppState::new();
        state.begin_validation();
        state.begin_generation();
        assert!(state.is_generating());
        state.finish_success();
        assert_eq!(state.phase(), GenerationPhase::Succeeded);

        state.set_background_mode(BackgroundMode::KeepOriginal);
        assert_eq!(state.phase(), GenerationPhase::Idle);
    }

    #[test]
    fn failure_message_is_kept_until_the_next_mutation() {
        let mut state = AppState::new();
        state.begin_validation();
        state.begin_generation();
        state.finish_failure("API error 500: boom".to_string());
        assert_eq!(state.phase(), GenerationPhase::Failed);
        assert_eq!(state.error(), Some("API error 500: boom"));

        state.toggle_pose("F2");
        assert_eq!(state.phase(), GenerationPhase::Idle);
        assert!(state.error().is_none());
        assert_eq!(state.selected_pose_ids(), ["F1", "F2"]);
    }

    #[test]
    fn validation_requires_both_references() {
        let mut state = AppState::new();
        let err = state.validate_required_inputs().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please upload Styling Reference and Face Reference."
        );

        state.set_slot(SlotKey::StylingRef, stub_image("styling"));
        assert!(state.validate_required_inputs().is_err());

        state.set_slot(SlotKey::FaceRef, stub_image("face"));
        assert!(state.validate_required_inputs().is_ok());
    }

    #[test]
    fn parameters_snapshot_reflects_current_state() {
        let mut state = AppState::new();
        state.set_gender(Gender::Male);
        state.toggle_pose("M3");
        state.set_model(ModelTier::Flash);

        let params = state.parameters();
        assert_eq!(params.gender, Gender::Male);
        assert_eq!(params.model, ModelTier::Flash);
        assert_eq!(params.pose_ids, vec!["M1", "M3"]);

        // later mutations must not affect the snapshot
        state.toggle_pose("M4");
        assert_eq!(params.pose_ids, vec!["M1", "M3"]);
    }
}
