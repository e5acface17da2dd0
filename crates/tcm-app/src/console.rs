//! Interactive console host for the wizard.
//!
//! Each step is rendered as a short prompt loop. Lines starting with `:`
//! are navigation commands available everywhere (`:back`, `:exit`, `:new`,
//! `:quit`, `:help`); everything else is input for the current step.

use std::io::Write;
use std::sync::Arc;

use tcm_ai::provider::CompletionProvider;
use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::form::FormPatch;
use tcm_core::models::inquiry::ChatRole;
use tcm_core::models::intake::{IntakePatch, SymptomDuration, SymptomsInput};
use tcm_core::models::media::MediaKind;
use tcm_core::models::modality::SmartConnectData;
use tcm_core::models::profile::{Gender, ProfilePatch};
use tcm_core::models::pulse::PulseQuality;
use tcm_wizard::boundary::{StepFault, guard};
use tcm_wizard::controller::{
    Confirmed, ExitHandler, ExitTarget, StepProps, StepView, Wizard,
};
use tcm_wizard::error::{StepError, WizardError};
use tcm_wizard::registry::{StepDescriptor, StepId};
use tcm_wizard::results::{ResultsView, SaveStatus};
use tcm_wizard::steps::capture::MediaCapture;
use tcm_wizard::steps::inquiry::{InquiryStep, confirm_summary, draft_summary};
use tcm_wizard::steps::modality::{
    AnalysisStep, Face, Modality, ReportDocument, Tongue, Voice, remove_document,
};
use tcm_wizard::steps::pulse::{MEASURE_SECONDS, PulseCountdown, PulseSelection, bpm_patch};
use tcm_wizard::steps::report::{finish_assessment, retry_submission};
use tcm_wizard::steps::{doctor, medicines};
use tcm_wizard::submission::Submitter;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::capture::FileCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Back,
    Exit,
    New,
    Quit,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(Command),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let command = match trimmed {
            ":b" | ":back" => Command::Back,
            ":x" | ":exit" => Command::Exit,
            ":n" | ":new" => Command::New,
            ":q" | ":quit" => Command::Quit,
            ":h" | ":help" | ":?" => Command::Help,
            _ => return Self::Text(trimmed.to_string()),
        };
        Self::Command(command)
    }
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Exited(ExitTarget),
    /// `:quit` or end of input.
    Quit,
}

enum Flow {
    /// The controller moved; render whatever is current now.
    Moved,
    /// Render the same step again.
    Stay,
    Command(Command),
    Fault(StepError),
}

/// Leaving the wizard from the console just ends the session.
#[derive(Debug, Default)]
pub struct ConsoleExit;

impl ExitHandler for ConsoleExit {
    fn exit_to_dashboard(&self) {
        info!("leaving assessment for the dashboard");
    }

    fn exit_to_login(&self) {
        info!("leaving assessment for the login screen");
    }
}

/// Lines typed on stdin, read on a background task.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

macro_rules! text {
    ($input:expr) => {
        match $input {
            Input::Text(text) => text,
            Input::Command(command) => return Ok(Flow::Command(command)),
        }
    };
}

pub struct ConsoleDriver<W> {
    lines: mpsc::UnboundedReceiver<String>,
    out: W,
    wizard: Wizard,
    provider: Arc<dyn CompletionProvider>,
    submitter: Option<Submitter>,
}

impl<W: Write> ConsoleDriver<W> {
    pub fn new(
        lines: mpsc::UnboundedReceiver<String>,
        out: W,
        wizard: Wizard,
        provider: Arc<dyn CompletionProvider>,
        submitter: Option<Submitter>,
    ) -> Self {
        Self {
            lines,
            out,
            wizard,
            provider,
            submitter,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn into_parts(self) -> (Wizard, W) {
        (self.wizard, self.out)
    }

    /// Drive the wizard until the user exits or input runs out.
    pub async fn run(&mut self) -> eyre::Result<Ending> {
        self.say(self.text(TextKey::ConsoleHelp))?;
        loop {
            let flow = match self.wizard.render_step() {
                StepView::Results(view) => self.results(&view).await?,
                StepView::Fault(fault) => self.fault(&fault).await?,
                StepView::Step { descriptor, props } => {
                    self.header(&descriptor)?;
                    let lang = self.wizard.language();
                    match guard(descriptor.id, lang, self.step(descriptor.id, props)).await {
                        Ok(flow) => flow?,
                        Err(fault) => {
                            self.wizard.report_fault(fault);
                            Flow::Stay
                        }
                    }
                }
            };

            match flow {
                Flow::Moved | Flow::Stay => {}
                Flow::Fault(err) => {
                    if let Some(step) = self.wizard.current_step() {
                        let fault = StepFault::from_error(step, &err, self.wizard.language());
                        self.wizard.report_fault(fault);
                    }
                }
                Flow::Command(command) => {
                    if let Some(ending) = self.command(command).await? {
                        return Ok(ending);
                    }
                }
            }
        }
    }

    fn say(&mut self, text: impl std::fmt::Display) -> eyre::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> eyre::Result<Input> {
        write!(self.out, "{prompt} > ")?;
        self.out.flush()?;
        Ok(match self.lines.recv().await {
            Some(line) => Input::parse(&line),
            None => Input::Command(Command::Quit),
        })
    }

    fn header(&mut self, descriptor: &StepDescriptor) -> eyre::Result<()> {
        let index = self.wizard.current_index() + 1;
        let len = self.wizard.len();
        self.say(format!("\n[{index}/{len}] {}", descriptor.label))
    }

    fn language(&self) -> Language {
        self.wizard.language()
    }

    fn text(&self, key: TextKey) -> &'static str {
        i18n::text(self.language(), key)
    }

    fn format(&self, key: TextKey, args: &[(&str, &str)]) -> String {
        i18n::format(self.language(), key, args)
    }

    async fn command(&mut self, command: Command) -> eyre::Result<Option<Ending>> {
        match command {
            Command::Back => {
                if self.wizard.go_to_previous().is_none() {
                    self.say(self.text(TextKey::AlreadyAtFirstStep))?;
                }
            }
            Command::Exit => {
                self.wizard.request_exit();
                if let Some(Confirmed::Exited(target)) = self.confirm_pending().await? {
                    return Ok(Some(Ending::Exited(target)));
                }
            }
            Command::New => {
                self.wizard.request_new_assessment();
                self.confirm_pending().await?;
            }
            Command::Quit => return Ok(Some(Ending::Quit)),
            Command::Help => self.say(self.text(TextKey::ConsoleHelp))?,
        }
        Ok(None)
    }

    async fn confirm_pending(&mut self) -> eyre::Result<Option<Confirmed>> {
        let Some(pending) = self.wizard.pending_confirmation() else {
            return Ok(None);
        };
        let (title, body) = pending.prompt(self.language());
        self.say(format!("{title}\n{body}"))?;
        match self.ask("[y/N]").await? {
            Input::Text(answer) if is_yes(&answer) => Ok(Some(self.wizard.confirm()?)),
            _ => {
                self.wizard.cancel();
                Ok(None)
            }
        }
    }

    async fn step(&mut self, step: StepId, props: StepProps) -> eyre::Result<Flow> {
        debug!(step = %step, remount_key = props.remount_key, "rendering step");
        match step {
            StepId::BasicInfo => self.basic_info(props).await,
            StepId::ProfileSummary => self.profile_summary(props).await,
            StepId::Symptoms => self.symptoms(props).await,
            StepId::UploadReports => self.upload_reports(props).await,
            StepId::UploadMedicine => self.upload_medicine(props).await,
            StepId::SelectDoctor => self.select_doctor(props).await,
            StepId::Inquiry => self.inquiry(props).await,
            StepId::InquirySummary => self.inquiry_summary(props).await,
            StepId::Tongue => self.modality::<Tongue>(props, TextKey::PromptTonguePath).await,
            StepId::Face => self.modality::<Face>(props, TextKey::PromptFacePath).await,
            StepId::Audio => self.modality::<Voice>(props, TextKey::PromptVoicePath).await,
            StepId::Pulse => self.pulse(props).await,
            StepId::SmartConnect => self.smart_connect(props).await,
            StepId::Analysis => self.analysis().await,
        }
    }

    /// Generic "Next", explaining why when the gate is closed.
    fn next(&mut self) -> eyre::Result<Flow> {
        if self.wizard.go_to_next().is_some() {
            return Ok(Flow::Moved);
        }
        self.say(self.text(TextKey::FillRequiredFields))?;
        Ok(Flow::Stay)
    }

    fn complete(&mut self, props: StepProps) -> eyre::Result<Flow> {
        match props.on_next {
            Some(token) => {
                self.wizard.complete_step(token)?;
                Ok(Flow::Moved)
            }
            None => self.next(),
        }
    }

    /// Apply a step patch. A rejected patch is shown and leaves the form as
    /// it was.
    fn apply(&mut self, props: StepProps, patch: FormPatch) -> eyre::Result<bool> {
        match self.wizard.apply(props.token, patch) {
            Ok(()) => Ok(true),
            Err(WizardError::Rejected(e)) => {
                self.say(e)?;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Show a recoverable step error. Non-retryable errors go to the fault
    /// boundary instead.
    fn recoverable(&mut self, err: StepError) -> eyre::Result<Option<Flow>> {
        if !err.is_retryable() {
            return Ok(Some(Flow::Fault(err)));
        }
        let message = err.message(self.language());
        self.say(message)?;
        Ok(None)
    }

    async fn retry_prompt(&mut self, err: StepError) -> eyre::Result<Flow> {
        if let Some(flow) = self.recoverable(err)? {
            return Ok(flow);
        }
        text!(self.ask(self.text(TextKey::PressEnterToRetry)).await?);
        Ok(Flow::Stay)
    }

    async fn basic_info(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let profile = self.wizard.form().profile.clone();

        let lang = self.language();

        let name = text!(self.ask(&field(self.text(TextKey::LabelName), &profile.name)).await?);
        let age = text!(self.ask(&field(self.text(TextKey::LabelAge), &profile.age)).await?);
        let current_gender = profile
            .gender
            .map(|g| gender_label(g, lang))
            .unwrap_or_default();
        let gender = text!(
            self.ask(&field(self.text(TextKey::LabelGender), current_gender))
                .await?
        );
        let height = text!(
            self.ask(&field(self.text(TextKey::LabelHeight), &profile.height))
                .await?
        );
        let weight = text!(
            self.ask(&field(self.text(TextKey::LabelWeight), &profile.weight))
                .await?
        );

        let gender = match parse_gender(&gender) {
            Ok(gender) => gender,
            Err(()) => {
                let message = self.format(TextKey::NotAGenderOption, &[("value", &gender)]);
                self.say(message)?;
                return Ok(Flow::Stay);
            }
        };
        let patch = ProfilePatch {
            name: non_empty(name),
            age: non_empty(age),
            gender,
            height: non_empty(height),
            weight: non_empty(weight),
        };
        if !self.apply(props.clone(), FormPatch::Profile(patch))? {
            return Ok(Flow::Stay);
        }
        self.next()
    }

    async fn profile_summary(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let profile = self.wizard.form().profile.clone();
        let lang = self.language();
        let line = self.format(
            TextKey::ProfileLine,
            &[
                ("name", &profile.name),
                ("age", &profile.age),
                ("gender", profile.gender.map(|g| gender_label(g, lang)).unwrap_or("-")),
                ("height", or_dash(&profile.height)),
                ("weight", or_dash(&profile.weight)),
            ],
        );
        self.say(line)?;
        text!(self.ask(self.text(TextKey::PressEnterToContinue)).await?);
        self.complete(props)
    }

    async fn symptoms(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let intake = self.wizard.form().intake.clone();

        let concern = text!(
            self.ask(&field(self.text(TextKey::LabelMainConcern), &intake.main_concern))
                .await?
        );
        let symptoms = text!(
            self.ask(&field(self.text(TextKey::LabelSymptomList), &intake.symptoms_joined()))
                .await?
        );
        let duration = text!(self.ask(self.text(TextKey::LabelDuration)).await?);

        let patch = IntakePatch {
            main_concern: non_empty(concern),
            symptoms: non_empty(symptoms).map(SymptomsInput::Joined),
            symptom_duration: parse_duration(&duration),
        };
        if !self.apply(props.clone(), FormPatch::Intake(patch))? {
            return Ok(Flow::Stay);
        }
        self.next()
    }

    async fn upload_reports(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let mut step = AnalysisStep::<ReportDocument>::new();
        loop {
            let files = self.wizard.form().files.clone();
            for (i, file) in files.iter().enumerate() {
                self.say(format!("  {}. {}", i + 1, file.name))?;
            }
            let line = text!(self.ask(self.text(TextKey::PromptReportPath)).await?);
            if line.is_empty() {
                return self.next();
            }
            if let Some(index) = removal_index(&line, files.len()) {
                let patch = remove_document(self.wizard.form(), files[index].id);
                self.apply(props.clone(), patch)?;
                continue;
            }

            self.say(self.text(TextKey::ReadingDocument))?;
            let form = self.wizard.form().clone();
            let capture = FileCapture::new(&line);
            match step
                .capture_and_analyze(&capture, self.provider.as_ref(), &form, self.language())
                .await
            {
                Ok(Some(patch)) => {
                    self.apply(props.clone(), patch)?;
                }
                Ok(None) => {}
                Err(err) => {
                    if let Some(flow) = self.recoverable(err)? {
                        return Ok(flow);
                    }
                }
            }
        }
    }

    async fn upload_medicine(&mut self, props: StepProps) -> eyre::Result<Flow> {
        loop {
            let list = self.wizard.form().intake.medicines.clone();
            for (i, medicine) in list.iter().enumerate() {
                self.say(format!("  {}. {}", i + 1, medicine.describe()))?;
            }
            let line = text!(self.ask(self.text(TextKey::PromptMedicines)).await?);
            if line.is_empty() {
                return self.next();
            }

            let patch = if let Some(entry) = line.strip_prefix("t ") {
                let (name, content) = match entry.split_once(':') {
                    Some((name, content)) => (name, Some(content)),
                    None => (entry, None),
                };
                medicines::add_text(self.wizard.form(), name, content)
            } else if let Some(path) = line.strip_prefix("i ") {
                match FileCapture::new(path).capture(MediaKind::Medicine).await {
                    Ok(media) => medicines::add_image(self.wizard.form(), &media, None),
                    Err(e) => {
                        self.say(e)?;
                        continue;
                    }
                }
            } else if let Some(index) = removal_index(&line, list.len()) {
                medicines::remove(self.wizard.form(), list[index].id)
            } else {
                self.say(self.text(TextKey::UnrecognizedEntry))?;
                continue;
            };
            self.apply(props.clone(), patch)?;
        }
    }

    async fn select_doctor(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let lang = self.language();
        let (levels, current) = doctor::options(self.wizard.form(), lang);
        let current = current.map(str::to_string);
        for (i, level) in levels.iter().enumerate() {
            let marker = if current.as_deref() == Some(level.id.as_str()) {
                "*"
            } else {
                " "
            };
            self.say(format!(" {marker}{}. {}", i + 1, level.name))?;
        }

        let line = text!(self.ask(self.text(TextKey::PromptChooseDoctor)).await?);
        let chosen = match pick(&line, levels.len()) {
            Some(index) => levels[index].id.clone(),
            None if line.is_empty() && current.is_some() => return self.complete(props),
            None => {
                self.say(self.text(TextKey::ChooseListedDoctor))?;
                return Ok(Flow::Stay);
            }
        };
        match doctor::select(&chosen, lang) {
            Ok(patch) => {
                if !self.apply(props.clone(), patch)? {
                    return Ok(Flow::Stay);
                }
            }
            Err(err) => return self.retry_prompt(err).await,
        }
        self.complete(props)
    }

    async fn inquiry(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let mut step = InquiryStep::new(self.wizard.form(), self.language());
        let mut suggestions = Vec::new();

        let doctor = self.text(TextKey::SpeakerDoctor);

        for message in step.session().messages().to_vec() {
            let speaker = match message.role {
                ChatRole::User => self.text(TextKey::SpeakerPatient),
                ChatRole::Assistant => doctor,
            };
            self.say(format!("{speaker}: {}", message.content))?;
        }
        match step.open(self.provider.as_ref()).await {
            Ok(Some((turn, patch))) => {
                self.apply(props.clone(), patch)?;
                self.say(format!("{doctor}: {}", turn.reply.content))?;
                suggestions = turn.suggestions;
            }
            Ok(None) => {}
            Err(err) => return self.retry_prompt(err).await,
        }

        loop {
            for (i, suggestion) in suggestions.iter().enumerate() {
                self.say(format!("  {}. {suggestion}", i + 1))?;
            }
            let line = text!(self.ask(self.text(TextKey::PromptInquiryAnswer)).await?);
            if line.is_empty() {
                return self.next();
            }
            let message = match pick(&line, suggestions.len()) {
                Some(index) => suggestions[index].clone(),
                None => line,
            };
            match step.send(self.provider.as_ref(), &message).await {
                Ok((turn, patch)) => {
                    self.apply(props.clone(), patch)?;
                    self.say(format!("{doctor}: {}", turn.reply.content))?;
                    suggestions = turn.suggestions;
                }
                Err(err) => {
                    if let Some(flow) = self.recoverable(err)? {
                        return Ok(flow);
                    }
                }
            }
        }
    }

    async fn inquiry_summary(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let form = self.wizard.form().clone();
        let draft = match draft_summary(self.provider.as_ref(), &form, self.language()).await {
            Ok(draft) => draft,
            Err(err) => return self.retry_prompt(err).await,
        };
        self.say(if draft.is_empty() { self.text(TextKey::NoSummary) } else { draft.as_str() })?;

        let line = text!(self.ask(self.text(TextKey::PromptSummary)).await?);
        let summary = if line.is_empty() { draft } else { line };
        if !self.apply(props.clone(), confirm_summary(&summary))? {
            return Ok(Flow::Stay);
        }
        self.complete(props)
    }

    async fn modality<M: Modality>(&mut self, props: StepProps, prompt: TextKey) -> eyre::Result<Flow> {
        let mut step = AnalysisStep::<M>::new();
        loop {
            if let Some(observation) = self.observation() {
                let recorded = self.format(TextKey::Recorded, &[("observation", &observation)]);
                self.say(recorded)?;
            }
            let line = text!(self.ask(self.text(prompt)).await?);
            if line.is_empty() {
                return self.next();
            }
            if line == "r" {
                let patch = match step.reset(self.wizard.form()) {
                    Ok(patch) => patch,
                    Err(err) => return Ok(Flow::Fault(err)),
                };
                self.apply(props.clone(), patch)?;
                continue;
            }

            self.say(self.text(TextKey::Analyzing))?;
            let form = self.wizard.form().clone();
            let capture = FileCapture::new(&line);
            match step
                .capture_and_analyze(&capture, self.provider.as_ref(), &form, self.language())
                .await
            {
                Ok(Some(patch)) => {
                    self.apply(props.clone(), patch)?;
                }
                Ok(None) => {}
                Err(err) => {
                    if let Some(flow) = self.recoverable(err)? {
                        return Ok(flow);
                    }
                }
            }
        }
    }

    /// One-line reading of the current modality step's stored result.
    fn observation(&self) -> Option<String> {
        let form = self.wizard.form();
        match self.wizard.current_step()? {
            StepId::Tongue => form.tongue.as_ref().map(|r| {
                r.analysis
                    .observation
                    .clone()
                    .unwrap_or_else(|| r.media.uri.clone())
            }),
            StepId::Face => form.face.as_ref().map(|r| {
                r.analysis
                    .observation
                    .clone()
                    .unwrap_or_else(|| r.media.uri.clone())
            }),
            StepId::Audio => form.voice.as_ref().map(|r| {
                r.analysis
                    .observation
                    .clone()
                    .unwrap_or_else(|| r.media.uri.clone())
            }),
            _ => None,
        }
    }

    async fn pulse(&mut self, props: StepProps) -> eyre::Result<Flow> {
        let lang = self.language();
        loop {
            let mut selection = PulseSelection::from_form(self.wizard.form());
            if let Some(bpm) = self.wizard.form().pulse.bpm {
                let rate = self.format(TextKey::PulseRate, &[("bpm", &bpm.to_string())]);
                self.say(rate)?;
            }
            for (i, quality) in PulseQuality::ALL.iter().enumerate() {
                let mark = if selection.contains(*quality) { "x" } else { " " };
                let name = match lang {
                    Language::En => quality.name_en(),
                    Language::Zh => quality.name_zh(),
                };
                self.say(format!("  [{mark}] {:>2}. {name}", i + 1))?;
            }

            let line = text!(self.ask(self.text(TextKey::PromptPulse)).await?);
            if line.is_empty() {
                return self.next();
            }
            if line == "t" {
                if let Some(bpm) = self.measure().await? {
                    let measured = self.format(TextKey::MeasuredBpm, &[("bpm", &bpm.to_string())]);
                    self.say(measured)?;
                    self.apply(props.clone(), bpm_patch(&bpm.to_string()))?;
                }
                continue;
            }
            if let Some(raw) = line.strip_prefix("b ") {
                self.apply(props.clone(), bpm_patch(raw))?;
                continue;
            }
            let Some(index) = pick(&line, PulseQuality::ALL.len()) else {
                self.say(self.text(TextKey::UnrecognizedEntry))?;
                continue;
            };
            match selection.toggle(PulseQuality::ALL[index]) {
                Ok(()) => {
                    self.apply(props.clone(), selection.patch())?;
                }
                Err(conflict) => self.say(conflict.message(lang))?,
            }
        }
    }

    /// Tap-count measurement: every empty line is one beat until the timer
    /// runs out. Any other line stops early.
    async fn measure(&mut self) -> eyre::Result<Option<u16>> {
        let instructions = self.format(
            TextKey::MeasureInstructions,
            &[("seconds", &MEASURE_SECONDS.to_string())],
        );
        self.say(instructions)?;
        let mut countdown = PulseCountdown::start(MEASURE_SECONDS);
        let bpm = loop {
            tokio::select! {
                bpm = countdown.finished() => break bpm,
                line = self.lines.recv() => match line {
                    Some(line) if line.trim().is_empty() => {
                        countdown.tap();
                    }
                    _ => break None,
                },
            }
        };
        info!(taps = countdown.taps(), bpm = ?bpm, "pulse measurement ended");
        countdown.cancel();
        Ok(bpm)
    }

    async fn smart_connect(&mut self, props: StepProps) -> eyre::Result<Flow> {
        if let Some(data) = &self.wizard.form().smart_connect {
            let imported = self.format(TextKey::ImportedFrom, &[("service", &data.service)]);
            self.say(imported)?;
        }
        let line = text!(self.ask(self.text(TextKey::PromptSmartConnect)).await?);
        if line.is_empty() {
            return self.next();
        }
        if line == "r" {
            self.apply(props.clone(), FormPatch::SmartConnect(None))?;
            return Ok(Flow::Stay);
        }

        let path = std::path::Path::new(line.trim_matches(['"', '\'']));
        let parsed = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).map_err(|e| e.to_string()));
        match parsed {
            Ok(synced_data) => {
                let service = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("import")
                    .to_string();
                let data = SmartConnectData {
                    service,
                    device: None,
                    synced_data,
                };
                self.apply(props.clone(), FormPatch::SmartConnect(Some(data)))?;
            }
            Err(e) => {
                let failed = self.format(
                    TextKey::ImportFailed,
                    &[("path", &path.display().to_string()), ("error", &e)],
                );
                self.say(failed)?;
            }
        }
        Ok(Flow::Stay)
    }

    async fn analysis(&mut self) -> eyre::Result<Flow> {
        self.say(self.text(TextKey::PreparingAssessment))?;
        let result = finish_assessment(
            &mut self.wizard,
            self.provider.as_ref(),
            self.submitter.as_ref(),
        )
        .await;
        match result {
            Ok(_) => Ok(Flow::Moved),
            Err(WizardError::Step(err)) => self.retry_prompt(err).await,
            Err(e) => Err(e.into()),
        }
    }

    async fn results(&mut self, view: &ResultsView) -> eyre::Result<Flow> {
        self.say(format!("\n{}", self.text(TextKey::StepResults)))?;
        self.say(render_results(view, self.language()))?;

        let can_retry = matches!(
            view.save_status,
            SaveStatus::Failed { can_retry: true, .. }
        );
        let prompt = if can_retry {
            self.format(
                TextKey::PromptResultsRetry,
                &[
                    ("retry", self.text(TextKey::Retry)),
                    ("view", self.text(TextKey::ViewResultsAnyway)),
                ],
            )
        } else {
            self.text(TextKey::PromptResults).to_string()
        };
        let line = text!(self.ask(&prompt).await?);
        if line == "s" && can_retry {
            if let Some(submitter) = &self.submitter {
                let outcome = retry_submission(&mut self.wizard, submitter).await;
                debug!(outcome = ?outcome, "save retried");
            }
        }
        Ok(Flow::Stay)
    }

    async fn fault(&mut self, fault: &StepFault) -> eyre::Result<Flow> {
        self.say(format!("{} ({})", fault.message, fault.step))?;
        let prompt = self.text(if fault.retryable {
            TextKey::PromptFaultRetry
        } else {
            TextKey::PromptFaultBack
        });
        let line = text!(self.ask(prompt).await?);
        match line.as_str() {
            "r" if fault.retryable => self.wizard.retry_step(),
            "b" => {
                self.wizard.fault_go_back();
            }
            _ => {}
        }
        Ok(Flow::Stay)
    }
}

pub fn render_results(view: &ResultsView, lang: Language) -> String {
    let mut out = String::new();
    let mut line = |key: TextKey, value: &str| {
        if !value.trim().is_empty() {
            out.push_str(&format!("{}: {value}\n", i18n::text(lang, key)));
        }
    };
    line(TextKey::LabelName, &view.name);
    line(TextKey::LabelMainConcern, &view.complaint);
    line(TextKey::StepSymptoms, &view.symptoms.join(", "));
    line(TextKey::LabelConstitution, &view.constitution);
    line(TextKey::LabelSyndrome, &view.syndrome);
    line(TextKey::LabelSummary, &view.summary);
    line(TextKey::StepTongue, view.tongue.as_deref().unwrap_or_default());
    line(TextKey::StepFace, view.face.as_deref().unwrap_or_default());
    line(TextKey::StepAudio, view.voice.as_deref().unwrap_or_default());
    line(TextKey::StepPulse, view.pulse.as_deref().unwrap_or_default());

    for rec in &view.recommendations {
        out.push_str(&format!("- [{}] {}: {}\n", rec.category, rec.title, rec.description));
    }

    let status = match &view.save_status {
        SaveStatus::Saved(id) => Some(i18n::format(lang, TextKey::SavedAsReport, &[("id", &id.to_string())])),
        SaveStatus::Guest => Some(i18n::text(lang, TextKey::NotSavedGuest).to_string()),
        SaveStatus::NotConfigured => Some(i18n::text(lang, TextKey::NotSavedNoStore).to_string()),
        SaveStatus::Failed { message, .. } => Some(message.clone()),
        SaveStatus::Pending => None,
    };
    if let Some(status) = status {
        out.push_str(&status);
        out.push('\n');
    }
    out
}

fn field(label: &str, current: &str) -> String {
    if current.trim().is_empty() {
        label.to_string()
    } else {
        format!("{label} [{current}]")
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

/// 1-based menu choice.
fn pick(line: &str, len: usize) -> Option<usize> {
    let n: usize = line.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn removal_index(line: &str, len: usize) -> Option<usize> {
    pick(line.strip_prefix("r ")?, len)
}

fn gender_label(gender: Gender, lang: Language) -> &'static str {
    let key = match gender {
        Gender::Male => TextKey::GenderMale,
        Gender::Female => TextKey::GenderFemale,
        Gender::Other => TextKey::GenderOther,
    };
    i18n::text(lang, key)
}

/// Empty keeps the current value.
fn parse_gender(raw: &str) -> Result<Option<Gender>, ()> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "m" | "male" | "男" => Ok(Some(Gender::Male)),
        "f" | "female" | "女" => Ok(Some(Gender::Female)),
        "o" | "other" | "其他" => Ok(Some(Gender::Other)),
        _ => Err(()),
    }
}

fn parse_duration(raw: &str) -> Option<SymptomDuration> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "d" | "days" => Some(SymptomDuration::Days),
        "w" | "weeks" => Some(SymptomDuration::Weeks),
        "m" | "months" => Some(SymptomDuration::Months),
        "y" | "years" => Some(SymptomDuration::Years),
        _ => None,
    }
}
