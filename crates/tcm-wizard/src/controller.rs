//! The wizard controller.
//!
//! Owns the form record and the current index in `[0, len]`, where `len`
//! is the results pseudo-step. Steps never mutate the form directly: they
//! obtain a [`StepToken`] while visible and hand their patches to
//! [`Wizard::apply`]. Every navigation, retry and reset bumps the
//! generation, so a reply that lands after its step went away is refused
//! instead of mutating someone else's data.

use std::sync::Arc;

use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::form::{FormData, FormPatch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::boundary::StepFault;
use crate::error::WizardError;
use crate::gate::can_proceed;
use crate::registry::{StepDescriptor, StepId, StepRegistry};
use crate::results::ResultsView;
use crate::submission::SubmissionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Reported on every index change so the host can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Capability handed to the visible step. Only valid until the next
/// navigation, retry or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepToken {
    pub step: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepProps {
    pub token: StepToken,
    /// Enables the generic "Next" control.
    pub can_proceed: bool,
    /// Present only for steps that advance themselves.
    pub on_next: Option<StepToken>,
    pub on_back: Option<StepToken>,
    /// Changes whenever the step must be mounted fresh.
    pub remount_key: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepView {
    Step {
        descriptor: StepDescriptor,
        props: StepProps,
    },
    Fault(StepFault),
    Results(Box<ResultsView>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Exit,
    NewAssessment,
}

impl Confirmation {
    /// Localized title and body for the confirmation dialog.
    pub fn prompt(&self, lang: Language) -> (&'static str, &'static str) {
        match self {
            Self::Exit => (
                i18n::text(lang, TextKey::ConfirmExitTitle),
                i18n::text(lang, TextKey::ConfirmExitBody),
            ),
            Self::NewAssessment => (
                i18n::text(lang, TextKey::ConfirmNewAssessmentTitle),
                i18n::text(lang, TextKey::ConfirmNewAssessmentBody),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTarget {
    Dashboard,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmed {
    Exited(ExitTarget),
    Reset,
}

/// Host callbacks for leaving the wizard.
pub trait ExitHandler: Send + Sync {
    fn exit_to_dashboard(&self);
    fn exit_to_login(&self);
}

pub struct Wizard {
    registry: StepRegistry,
    steps: Arc<[StepDescriptor]>,
    is_logged_in: bool,
    language: Language,
    current: usize,
    generation: u64,
    form: FormData,
    pending: Option<Confirmation>,
    fault: Option<StepFault>,
    submission: Option<SubmissionOutcome>,
    report_id: Uuid,
    exit: Arc<dyn ExitHandler>,
}

impl Wizard {
    pub fn new(is_logged_in: bool, language: Language, exit: Arc<dyn ExitHandler>) -> Self {
        let mut registry = StepRegistry::default();
        let steps = registry.steps(is_logged_in, language);
        Self {
            registry,
            steps,
            is_logged_in,
            language,
            current: 0,
            generation: 0,
            form: FormData::default(),
            pending: None,
            fault: None,
            submission: None,
            report_id: Uuid::new_v4(),
            exit,
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn steps(&self) -> &Arc<[StepDescriptor]> {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// `None` on the results pseudo-step.
    pub fn current_step(&self) -> Option<StepId> {
        self.steps.get(self.current).map(|d| d.id)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.steps.len()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.pending
    }

    pub fn fault(&self) -> Option<&StepFault> {
        self.fault.as_ref()
    }

    pub fn submission(&self) -> Option<&SubmissionOutcome> {
        self.submission.as_ref()
    }

    /// Id the report of this assessment is saved under. A new assessment
    /// gets a new id.
    pub fn report_id(&self) -> Uuid {
        self.report_id
    }

    pub fn step_token(&self) -> StepToken {
        StepToken {
            step: self.current,
            generation: self.generation,
        }
    }

    /// Generic "Next". Refused while the gate is closed, a no-op on the
    /// results pseudo-step. `analysis` only finishes through
    /// [`finish_assessment`](crate::steps::report::finish_assessment).
    pub fn go_to_next(&mut self) -> Option<Transition> {
        let step = self.current_step()?;
        if step == StepId::Analysis {
            debug!("next refused on analysis, the report is not generated yet");
            return None;
        }
        if !can_proceed(step, &self.form) {
            debug!(step = %step, "next blocked by gate");
            return None;
        }
        Some(self.advance())
    }

    pub fn go_to_previous(&mut self) -> Option<Transition> {
        if self.current == 0 {
            return None;
        }
        let from = self.current;
        self.current -= 1;
        self.bump();
        info!(from, to = self.current, "step back");
        Some(Transition {
            from,
            to: self.current,
            direction: Direction::Backward,
        })
    }

    /// In-step completion for self-advancing steps. Bypasses the gate.
    pub fn complete_step(&mut self, token: StepToken) -> Result<Transition, WizardError> {
        self.check_token(token)?;
        if self.is_finished() {
            return Err(self.stale(token));
        }
        Ok(self.advance())
    }

    /// In-step "Back".
    pub fn step_back(&mut self, token: StepToken) -> Result<Option<Transition>, WizardError> {
        self.check_token(token)?;
        Ok(self.go_to_previous())
    }

    /// Merge a patch produced by the step holding `token`.
    pub fn apply(&mut self, token: StepToken, patch: FormPatch) -> Result<(), WizardError> {
        self.check_token(token)?;
        let group = patch.group();
        self.form.apply(patch).inspect_err(|e| {
            warn!(group, error = %e, "patch rejected");
        })?;
        debug!(group, step = self.current, "patch applied");
        Ok(())
    }

    pub fn render_step(&self) -> StepView {
        let Some(descriptor) = self.steps.get(self.current).copied() else {
            return StepView::Results(Box::new(ResultsView::build(
                &self.form,
                self.submission.as_ref(),
                self.language,
            )));
        };
        if let Some(fault) = &self.fault {
            return StepView::Fault(fault.clone());
        }

        let token = self.step_token();
        let callbacks = descriptor.id.is_self_advancing().then_some(token);
        StepView::Step {
            descriptor,
            props: StepProps {
                token,
                can_proceed: can_proceed(descriptor.id, &self.form),
                on_next: callbacks,
                on_back: callbacks,
                remount_key: self.generation,
            },
        }
    }

    pub fn request_exit(&mut self) {
        self.pending = Some(Confirmation::Exit);
    }

    pub fn request_new_assessment(&mut self) {
        self.pending = Some(Confirmation::NewAssessment);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn confirm(&mut self) -> Result<Confirmed, WizardError> {
        match self.pending.take() {
            None => Err(WizardError::NoPendingConfirmation),
            Some(Confirmation::Exit) => {
                let target = if self.is_logged_in {
                    self.exit.exit_to_dashboard();
                    ExitTarget::Dashboard
                } else {
                    self.exit.exit_to_login();
                    ExitTarget::Login
                };
                info!(?target, "wizard exited");
                Ok(Confirmed::Exited(target))
            }
            Some(Confirmation::NewAssessment) => {
                self.start_new_assessment();
                Ok(Confirmed::Reset)
            }
        }
    }

    /// Reset to an empty form at index 0. Hosts go through
    /// [`request_new_assessment`](Self::request_new_assessment) so the user
    /// confirms first.
    pub fn start_new_assessment(&mut self) {
        self.form = FormData::default();
        self.current = 0;
        self.fault = None;
        self.pending = None;
        self.submission = None;
        self.report_id = Uuid::new_v4();
        self.bump();
        info!("new assessment started");
    }

    /// Error boundary: show the fault instead of the current step.
    pub fn report_fault(&mut self, fault: StepFault) {
        warn!(step = %fault.step, message = %fault.message, "step fault");
        self.fault = Some(fault);
        self.bump();
    }

    /// Clear the fault and mount the current step fresh.
    pub fn retry_step(&mut self) {
        self.fault = None;
        self.bump();
    }

    /// Clear the fault and go back one step.
    pub fn fault_go_back(&mut self) -> Option<Transition> {
        self.fault = None;
        let transition = self.go_to_previous();
        if transition.is_none() {
            self.bump();
        }
        transition
    }

    pub(crate) fn record_submission(&mut self, outcome: SubmissionOutcome) {
        self.submission = Some(outcome);
    }

    pub fn set_logged_in(&mut self, is_logged_in: bool) {
        self.is_logged_in = is_logged_in;
        self.refresh_steps();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.refresh_steps();
    }

    /// Rebuild the step list. The current step keeps its identity when it
    /// still exists; otherwise the index is clamped into the new range.
    fn refresh_steps(&mut self) {
        let steps = self.registry.steps(self.is_logged_in, self.language);
        if Arc::ptr_eq(&steps, &self.steps) {
            return;
        }
        let current = self.current_step();
        let finished = self.is_finished();
        self.steps = steps;

        self.current = if finished {
            self.steps.len()
        } else {
            current
                .and_then(|id| self.steps.iter().position(|d| d.id == id))
                .unwrap_or(self.current)
                .min(self.steps.len())
        };
        self.bump();
    }

    fn advance(&mut self) -> Transition {
        let from = self.current;
        self.current = (self.current + 1).min(self.steps.len());
        self.bump();
        info!(from, to = self.current, "step forward");
        Transition {
            from,
            to: self.current,
            direction: Direction::Forward,
        }
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn check_token(&self, token: StepToken) -> Result<(), WizardError> {
        if token == self.step_token() && self.fault.is_none() {
            Ok(())
        } else {
            Err(self.stale(token))
        }
    }

    fn stale(&self, token: StepToken) -> WizardError {
        debug!(
            step = token.step,
            generation = token.generation,
            current_generation = self.generation,
            "stale step token"
        );
        WizardError::StaleToken {
            step: token.step,
            generation: token.generation,
        }
    }
}
