//! AI diagnosis request lifecycle.
//!
//! The visitor describes a challenge in free text; the page asks a
//! structured-generation service for a four-part diagnosis and renders it
//! with a copy-to-clipboard action.
//!
//! [`DiagnosisFlow`] is a pure state machine: UI events go in through
//! [`DiagnosisFlow::handle`], side effects for the front end come out as
//! [`FlowEffect`]s. The single suspension point, the network call, lives in
//! [`request_diagnosis`], and [`submit`] strings the two together for
//! callers that just want the resulting [`RequestState`].
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Success(result)
//!                     │                 │
//!                     └──err──▶ Error ◀─┘ (next submit goes back to Loading)
//! ```

use std::sync::Mutex;
use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::api::{StructuredGenerator, StructuredRequest, generate_request_id};
use crate::config::LandingConfig;
use crate::error::{ClipboardError, DiagnosisError, TransportFailure, ValidationFailure};
use crate::json_schema_for;

// ── Copy ──────────────────────────────────────────────────────────────

/// Persona and output contract sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "Você é um mentor de alta performance e estrategista mental, \
especialista no e-book 'O Poder da Reprogramação Mental'. Sua tarefa é analisar o desafio do \
usuário e fornecer uma análise estruturada em JSON. A resposta deve ser inspiradora, direta e \
demonstrar como o e-book oferece as ferramentas para a maestria. Use uma linguagem sofisticada. \
Responda em português do Brasil.";

pub const SUBMIT_LABEL: &str = "Gerar meu diagnóstico";
pub const LOADING_LABEL: &str = "Analisando...";
pub const SKELETON_LABEL: &str = "Análise da IA em andamento...";
pub const ERROR_MESSAGE: &str = "Ocorreu um erro ao processar sua análise. Isso pode ser uma \
instabilidade temporária. Por favor, tente refinar sua pergunta ou aguarde um momento.";
pub const COPY_LABEL: &str = "Copiar";
pub const COPIED_LABEL: &str = "Copiado!";

/// How long the invalid-input shake stays applied.
pub const SHAKE_DURATION: Duration = Duration::from_millis(500);
/// How long the copy button shows its confirmation.
pub const COPIED_DURATION: Duration = Duration::from_millis(2500);

// ── Request / result ──────────────────────────────────────────────────

/// A prompt that is known to be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisRequest {
    prompt: String,
}

impl DiagnosisRequest {
    pub fn new(raw: &str) -> Result<Self, DiagnosisError> {
        let prompt = raw.trim();
        if prompt.is_empty() {
            return Err(DiagnosisError::InvalidInput);
        }
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// The four-part diagnosis. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosisResult {
    /// Short analysis of the visitor's challenge.
    pub insight: String,
    /// The e-book concept that applies.
    pub concept: String,
    /// A first practical step.
    pub action: String,
    /// A short inspirational quote.
    pub quote: String,
}

/// Icon shown next to a result section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIcon {
    Insight,
    Concept,
    Action,
}

impl SectionIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Insight => "💡",
            Self::Concept => "📖",
            Self::Action => "✅",
        }
    }
}

/// One labelled block of the rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSection<'a> {
    pub icon: SectionIcon,
    pub heading: &'static str,
    pub body: &'a str,
}

impl DiagnosisResult {
    /// The three labelled sections, in display order.
    pub fn sections(&self) -> [ResultSection<'_>; 3] {
        [
            ResultSection {
                icon: SectionIcon::Insight,
                heading: "Insight Chave",
                body: &self.insight,
            },
            ResultSection {
                icon: SectionIcon::Concept,
                heading: "Conceito do E-book",
                body: &self.concept,
            },
            ResultSection {
                icon: SectionIcon::Action,
                heading: "Sua Primeira Ação",
                body: &self.action,
            },
        ]
    }

    /// The quote as shown in the blockquote.
    pub fn quote_block(&self) -> String {
        format!("\"{}\"", self.quote)
    }

    /// Plain-text summary written by the copy button.
    pub fn clipboard_summary(&self) -> String {
        format!(
            "Diagnóstico de Performance:\n\n💡 Insight: {}\n\n📖 Conceito do E-book: {}\n\n✅ Primeira Ação: {}\n\n\"{}\"",
            self.insight, self.concept, self.action, self.quote
        )
    }
}

// ── Schemas ───────────────────────────────────────────────────────────

/// Response schema in the provider's OpenAPI subset, with the field
/// descriptions the model sees.
pub fn provider_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "insight": {
                "type": "STRING",
                "description": "Análise concisa (1-2 frases) do desafio do usuário."
            },
            "concept": {
                "type": "STRING",
                "description": "O principal conceito do e-book que se aplica ao desafio."
            },
            "action": {
                "type": "STRING",
                "description": "Um primeiro passo prático e acionável para o usuário."
            },
            "quote": {
                "type": "STRING",
                "description": "Uma citação curta e inspiradora relacionada ao desafio."
            }
        },
        "required": ["insight", "concept", "action", "quote"],
        "propertyOrdering": ["insight", "concept", "action", "quote"]
    })
}

/// Parse and validate the service's JSON text.
///
/// Validation runs against the JSON Schema derived from [`DiagnosisResult`],
/// so a missing or non-string field is reported with its path before
/// deserialisation is attempted.
pub fn parse_diagnosis(text: &str) -> Result<DiagnosisResult, ValidationFailure> {
    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|e| ValidationFailure::MalformedJson(e.to_string()))?;

    let schema = json_schema_for::<DiagnosisResult>();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| ValidationFailure::Schema(vec![format!("invalid schema: {e}")]))?;

    let errors: Vec<String> = validator
        .iter_errors(&value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();
    if !errors.is_empty() {
        return Err(ValidationFailure::Schema(errors));
    }

    serde_json::from_value(value).map_err(|e| ValidationFailure::Schema(vec![e.to_string()]))
}

// ── State ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(DiagnosisResult),
    /// Holds the user-facing message only, never partial result data.
    Error(String),
}

/// The form's submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: true,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

/// A visual cue that switches itself off after a fixed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transient {
    until: Option<Instant>,
}

impl Transient {
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    pub fn clear(&mut self) {
        self.until = None;
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear the cue once its deadline has passed. Returns `true` when it
    /// was switched off by this call.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FlowEvent<'a> {
    Submit { input: &'a str },
    CopyClicked,
    /// Periodic clock tick; expires transient cues.
    Tick,
}

/// Side effects for the front end to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    /// Apply the invalid-input shake to the prompt field.
    Shake,
    ClearShake,
    /// Put the skeleton placeholder in the result area.
    ShowSkeleton,
    ScrollResultIntoView,
    /// Start the network call for this request.
    SendRequest(DiagnosisRequest),
    RenderResult(DiagnosisResult),
    RenderError(String),
    /// Re-enable the submit control with its original label.
    RestoreSubmit,
    WriteClipboard(String),
    ShowCopied,
    RevertCopyButton,
}

/// State machine behind the diagnosis form and result panel.
#[derive(Debug, Default)]
pub struct DiagnosisFlow {
    state: RequestState,
    submit: SubmitControl,
    shake: Transient,
    copied: Transient,
}

impl DiagnosisFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit
    }

    pub fn is_shaking(&self, now: Instant) -> bool {
        self.shake.is_active(now)
    }

    /// Copy button label and whether it is clickable.
    pub fn copy_button(&self, now: Instant) -> (&'static str, bool) {
        if self.copied.is_active(now) {
            (COPIED_LABEL, false)
        } else {
            (COPY_LABEL, true)
        }
    }

    pub fn handle(&mut self, event: FlowEvent<'_>, now: Instant) -> Vec<FlowEffect> {
        match event {
            FlowEvent::Submit { input } => self.on_submit(input, now),
            FlowEvent::CopyClicked => self.on_copy_clicked(now),
            FlowEvent::Tick => {
                let mut effects = Vec::new();
                if self.shake.expire(now) {
                    effects.push(FlowEffect::ClearShake);
                }
                if self.copied.expire(now) {
                    effects.push(FlowEffect::RevertCopyButton);
                }
                effects
            }
        }
    }

    fn on_submit(&mut self, input: &str, now: Instant) -> Vec<FlowEffect> {
        if !self.submit.enabled {
            debug!("Submit ignored while a diagnosis is in flight");
            return Vec::new();
        }
        match DiagnosisRequest::new(input) {
            Err(_) => {
                self.shake.arm(now, SHAKE_DURATION);
                vec![FlowEffect::Shake]
            }
            Ok(request) => {
                self.state = RequestState::Loading;
                self.submit = SubmitControl {
                    enabled: false,
                    label: LOADING_LABEL.to_string(),
                };
                self.copied.clear();
                vec![
                    FlowEffect::ShowSkeleton,
                    FlowEffect::ScrollResultIntoView,
                    FlowEffect::SendRequest(request),
                ]
            }
        }
    }

    /// Feed the outcome of the network call back in.
    ///
    /// Whatever the outcome, the submit control is restored.
    pub fn complete(&mut self, outcome: Result<DiagnosisResult, DiagnosisError>) -> Vec<FlowEffect> {
        let render = match outcome {
            Ok(result) => {
                self.state = RequestState::Success(result.clone());
                FlowEffect::RenderResult(result)
            }
            Err(e) => {
                error!(kind = e.kind(), "AI diagnosis error: {e}");
                self.state = RequestState::Error(ERROR_MESSAGE.to_string());
                FlowEffect::RenderError(ERROR_MESSAGE.to_string())
            }
        };
        self.submit = SubmitControl::default();
        vec![render, FlowEffect::RestoreSubmit]
    }

    fn on_copy_clicked(&mut self, now: Instant) -> Vec<FlowEffect> {
        match &self.state {
            RequestState::Success(result) if !self.copied.is_active(now) => {
                vec![FlowEffect::WriteClipboard(result.clipboard_summary())]
            }
            _ => Vec::new(),
        }
    }

    /// Feed the outcome of a clipboard write back in.
    ///
    /// A failed write is logged and leaves the visible state untouched.
    pub fn copy_finished(
        &mut self,
        outcome: Result<(), ClipboardError>,
        now: Instant,
    ) -> Vec<FlowEffect> {
        match outcome {
            Ok(()) => {
                self.copied.arm(now, COPIED_DURATION);
                vec![FlowEffect::ShowCopied]
            }
            Err(e) => {
                error!("Falha ao copiar texto: {e}");
                Vec::new()
            }
        }
    }
}

// ── Driver ────────────────────────────────────────────────────────────

/// Ask the generator for a diagnosis and validate what comes back.
///
/// Bounded by `config.request_timeout`; no retry.
pub async fn request_diagnosis(
    generator: &dyn StructuredGenerator,
    request: &DiagnosisRequest,
    config: &LandingConfig,
) -> Result<DiagnosisResult, DiagnosisError> {
    let structured = StructuredRequest {
        request_id: generate_request_id(),
        model: config.model.clone(),
        prompt: request.prompt().to_string(),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        response_schema: provider_response_schema(),
    };

    let text = match tokio::time::timeout(config.request_timeout, generator.generate(&structured))
        .await
    {
        Ok(outcome) => outcome?,
        Err(_) => return Err(TransportFailure::Timeout(config.request_timeout).into()),
    };

    let result = parse_diagnosis(&text)?;
    info!(request_id = %structured.request_id, "Diagnosis ready");
    Ok(result)
}

/// Run one full submission against a shared flow and return the state it
/// ends in. The lock is never held across the network call.
pub async fn submit(
    flow: &Mutex<DiagnosisFlow>,
    generator: &dyn StructuredGenerator,
    config: &LandingConfig,
    input: &str,
) -> RequestState {
    let effects = flow
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .handle(FlowEvent::Submit { input }, Instant::now());

    let request = effects.into_iter().find_map(|effect| match effect {
        FlowEffect::SendRequest(request) => Some(request),
        _ => None,
    });

    if let Some(request) = request {
        let outcome = request_diagnosis(generator, &request, config).await;
        flow.lock()
            .unwrap_or_else(|e| e.into_inner())
            .complete(outcome);
    }

    flow.lock()
        .unwrap_or_else(|e| e.into_inner())
        .state()
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenerateFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator returning a canned outcome and counting calls.
    struct CannedGenerator {
        outcome: Result<String, TransportFailure>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CannedGenerator {
        fn ok(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn err(failure: TransportFailure) -> Self {
            Self {
                outcome: Err(failure),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StructuredGenerator for CannedGenerator {
        fn generate<'a>(&'a self, request: &'a StructuredRequest) -> GenerateFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                self.outcome.clone()
            })
        }
    }

    const FULL: &str = r#"{
        "insight": "Você busca perfeição antes de agir.",
        "concept": "Reprogramação de crenças limitantes",
        "action": "Escreva hoje uma tarefa de 10 minutos e conclua-a.",
        "quote": "A ação cura o medo."
    }"#;

    fn sample() -> DiagnosisResult {
        parse_diagnosis(FULL).unwrap()
    }

    #[test]
    fn request_trims_and_rejects_blank() {
        assert_eq!(
            DiagnosisRequest::new("  foco  ").unwrap().prompt(),
            "foco"
        );
        assert_eq!(
            DiagnosisRequest::new(" \n\t "),
            Err(DiagnosisError::InvalidInput)
        );
    }

    #[tokio::test]
    async fn blank_prompt_shakes_and_never_calls_the_service() {
        let generator = CannedGenerator::ok(FULL);
        let flow = Mutex::new(DiagnosisFlow::new());
        let config = LandingConfig::default();

        for input in ["", "   ", "\n\t"] {
            let state = submit(&flow, &generator, &config, input).await;
            assert_eq!(state, RequestState::Idle);
            assert!(flow.lock().unwrap().is_shaking(Instant::now()));
        }
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn shake_expires_after_half_a_second() {
        let mut flow = DiagnosisFlow::new();
        let t0 = Instant::now();
        assert_eq!(
            flow.handle(FlowEvent::Submit { input: " " }, t0),
            vec![FlowEffect::Shake]
        );
        assert!(flow.is_shaking(t0 + Duration::from_millis(499)));
        assert!(flow.handle(FlowEvent::Tick, t0 + Duration::from_millis(100)).is_empty());
        assert_eq!(
            flow.handle(FlowEvent::Tick, t0 + SHAKE_DURATION),
            vec![FlowEffect::ClearShake]
        );
        assert!(!flow.is_shaking(t0 + SHAKE_DURATION));
    }

    #[test]
    fn valid_submit_enters_loading_and_disables_the_control() {
        let mut flow = DiagnosisFlow::new();
        let effects = flow.handle(FlowEvent::Submit { input: " quero foco " }, Instant::now());
        assert_eq!(
            effects,
            vec![
                FlowEffect::ShowSkeleton,
                FlowEffect::ScrollResultIntoView,
                FlowEffect::SendRequest(DiagnosisRequest::new("quero foco").unwrap()),
            ]
        );
        assert_eq!(flow.state(), &RequestState::Loading);
        assert!(!flow.submit_control().enabled);
        assert_eq!(flow.submit_control().label, LOADING_LABEL);
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let mut flow = DiagnosisFlow::new();
        flow.handle(FlowEvent::Submit { input: "a" }, Instant::now());
        assert!(flow
            .handle(FlowEvent::Submit { input: "b" }, Instant::now())
            .is_empty());
        assert_eq!(flow.state(), &RequestState::Loading);
    }

    #[tokio::test]
    async fn success_renders_every_field_verbatim() {
        let generator = CannedGenerator::ok(FULL);
        let flow = Mutex::new(DiagnosisFlow::new());
        let state = submit(&flow, &generator, &LandingConfig::default(), "procrastino").await;

        let RequestState::Success(result) = state else {
            panic!("expected success, got {state:?}");
        };
        let sections = result.sections();
        assert_eq!(sections[0].heading, "Insight Chave");
        assert_eq!(sections[0].body, "Você busca perfeição antes de agir.");
        assert_eq!(sections[1].body, "Reprogramação de crenças limitantes");
        assert_eq!(sections[2].heading, "Sua Primeira Ação");
        assert_eq!(
            sections[2].body,
            "Escreva hoje uma tarefa de 10 minutos e conclua-a."
        );
        assert_eq!(result.quote_block(), "\"A ação cura o medo.\"");
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn clipboard_summary_has_the_fixed_format() {
        let result = DiagnosisResult {
            insight: "I".into(),
            concept: "C".into(),
            action: "A".into(),
            quote: "Q".into(),
        };
        assert_eq!(
            result.clipboard_summary(),
            "Diagnóstico de Performance:\n\n💡 Insight: I\n\n📖 Conceito do E-book: C\n\n✅ Primeira Ação: A\n\n\"Q\""
        );
    }

    #[tokio::test]
    async fn missing_field_shows_error_and_no_partial_data() {
        let generator = CannedGenerator::ok(
            r#"{"insight": "parcial", "concept": "x", "action": "y"}"#,
        );
        let flow = Mutex::new(DiagnosisFlow::new());
        let state = submit(&flow, &generator, &LandingConfig::default(), "foco").await;
        assert_eq!(state, RequestState::Error(ERROR_MESSAGE.to_string()));
        let RequestState::Error(message) = state else {
            unreachable!()
        };
        assert!(!message.contains("parcial"));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let generator = CannedGenerator::ok("{\"insight\": ");
        let flow = Mutex::new(DiagnosisFlow::new());
        let state = submit(&flow, &generator, &LandingConfig::default(), "foco").await;
        assert_eq!(state, RequestState::Error(ERROR_MESSAGE.to_string()));
    }

    #[test]
    fn parse_reports_the_missing_field() {
        let err = parse_diagnosis(r#"{"insight": "a", "concept": "b", "action": "c"}"#)
            .unwrap_err();
        let ValidationFailure::Schema(errors) = err else {
            panic!("expected schema failure");
        };
        assert!(errors.iter().any(|e| e.contains("quote")));
    }

    #[test]
    fn parse_rejects_non_string_fields() {
        let err = parse_diagnosis(r#"{"insight": 1, "concept": "b", "action": "c", "quote": "d"}"#)
            .unwrap_err();
        assert!(matches!(err, ValidationFailure::Schema(_)));
        assert!(matches!(
            parse_diagnosis("not json"),
            Err(ValidationFailure::MalformedJson(_))
        ));
    }

    #[tokio::test]
    async fn submit_control_is_restored_on_every_path() {
        let config = LandingConfig::default();
        let generators = [
            CannedGenerator::ok(FULL),
            CannedGenerator::ok("[]"),
            CannedGenerator::err(TransportFailure::Status {
                status: 500,
                body: "boom".into(),
            }),
            CannedGenerator::err(TransportFailure::Request("connection refused".into())),
        ];
        for generator in &generators {
            let flow = Mutex::new(DiagnosisFlow::new());
            submit(&flow, generator, &config, "foco").await;
            let flow = flow.lock().unwrap();
            assert_eq!(flow.submit_control(), &SubmitControl::default());
            assert_eq!(flow.submit_control().label, SUBMIT_LABEL);
        }
    }

    #[tokio::test]
    async fn slow_service_times_out_as_transport_failure() {
        let generator = CannedGenerator {
            delay: Duration::from_millis(200),
            ..CannedGenerator::ok(FULL)
        };
        let config = LandingConfig {
            request_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let request = DiagnosisRequest::new("foco").unwrap();
        let err = request_diagnosis(&generator, &request, &config)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DiagnosisError::Transport(TransportFailure::Timeout(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn next_submit_after_error_goes_back_to_loading() {
        let mut flow = DiagnosisFlow::new();
        flow.handle(FlowEvent::Submit { input: "a" }, Instant::now());
        flow.complete(Err(TransportFailure::EmptyResponse.into()));
        assert!(matches!(flow.state(), RequestState::Error(_)));

        flow.handle(FlowEvent::Submit { input: "b" }, Instant::now());
        assert_eq!(flow.state(), &RequestState::Loading);
    }

    #[test]
    fn copy_confirms_for_two_and_a_half_seconds() {
        let mut flow = DiagnosisFlow::new();
        let t0 = Instant::now();
        flow.handle(FlowEvent::Submit { input: "a" }, t0);
        flow.complete(Ok(sample()));

        let effects = flow.handle(FlowEvent::CopyClicked, t0);
        assert_eq!(
            effects,
            vec![FlowEffect::WriteClipboard(sample().clipboard_summary())]
        );
        assert_eq!(flow.copy_finished(Ok(()), t0), vec![FlowEffect::ShowCopied]);
        assert_eq!(flow.copy_button(t0), (COPIED_LABEL, false));

        // Disabled while confirming.
        assert!(flow.handle(FlowEvent::CopyClicked, t0).is_empty());

        assert_eq!(
            flow.handle(FlowEvent::Tick, t0 + COPIED_DURATION),
            vec![FlowEffect::RevertCopyButton]
        );
        assert_eq!(flow.copy_button(t0 + COPIED_DURATION), (COPY_LABEL, true));
    }

    #[test]
    fn clipboard_failure_leaves_the_button_alone() {
        let mut flow = DiagnosisFlow::new();
        let t0 = Instant::now();
        flow.handle(FlowEvent::Submit { input: "a" }, t0);
        flow.complete(Ok(sample()));

        let effects = flow.copy_finished(Err(ClipboardError::Write("denied".into())), t0);
        assert!(effects.is_empty());
        assert_eq!(flow.copy_button(t0), (COPY_LABEL, true));
        assert!(matches!(flow.state(), RequestState::Success(_)));
    }

    #[test]
    fn copy_without_result_does_nothing() {
        let mut flow = DiagnosisFlow::new();
        assert!(flow.handle(FlowEvent::CopyClicked, Instant::now()).is_empty());
    }

    #[test]
    fn provider_schema_requires_all_fields() {
        let schema = provider_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ["insight", "concept", "action", "quote"]);
        assert_eq!(schema["properties"]["quote"]["type"], "STRING");
    }
}
