use anyhow::Result;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::config::Settings;
use crate::error::PipelineError;
use crate::llm::{CompletionService, PromptTemplates};
use crate::models::{MeetingState, StageKind};
use crate::parse::ParseStrictness;
use crate::stages::{Stage, StageConfig, StageContext, standard_stages};

/// Fixed sequence of stages plus the state-merge reducer
///
/// Stages run one at a time, each awaited before the next starts. After
/// each stage its partial update is merged into the running state with
/// `MeetingState::apply`.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    templates: PromptTemplates,
    config: StageConfig,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PromptTemplates::default(), StageConfig::default())
    }
}

impl Pipeline {
    pub fn new(templates: PromptTemplates, config: StageConfig) -> Self {
        Self {
            stages: standard_stages(),
            templates,
            config,
        }
    }

    /// Build the pipeline with prompt overrides and strictness from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut templates = PromptTemplates::default();
        if let Some(dir) = &settings.pipeline.prompts_dir {
            let loaded = templates.load_overrides(dir)?;
            info!("Loaded {} prompt override(s) from {:?}", loaded, dir);
        }

        let config = StageConfig {
            strictness: if settings.pipeline.strict_parsing {
                ParseStrictness::Strict
            } else {
                ParseStrictness::Lenient
            },
            ..Default::default()
        };

        Ok(Self::new(templates, config))
    }

    #[cfg(test)]
    pub(crate) fn with_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            templates: PromptTemplates::default(),
            config: StageConfig::default(),
        }
    }

    /// Run every stage in order and return the final state
    ///
    /// Stage failures are absorbed into fallback values, so a run always
    /// reaches the last stage unless a stage returns `Err`, which is
    /// propagated as is.
    pub async fn run(
        &self,
        initial: MeetingState,
        llm: &dyn CompletionService,
    ) -> Result<MeetingState, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", run_id = %run_id);

        async move {
            let mut state = initial;
            let total = self.stages.len();
            let ctx = self.context(llm);

            for (index, stage) in self.stages.iter().enumerate() {
                let kind = stage.kind();
                info!("[Step {}/{}] {}...", index + 1, total, kind.label());

                let update = stage
                    .run(&state, &ctx)
                    .await
                    .map_err(|source| PipelineError::Stage {
                        stage: kind.name(),
                        source,
                    })?;
                state.apply(update);
            }

            info!(
                "Pipeline finished at {} with {} error(s)",
                state.current_step,
                state.errors.len()
            );
            Ok::<_, PipelineError>(state)
        }
        .instrument(span)
        .await
    }

    /// Run a single stage against an existing state and merge its update
    ///
    /// Useful for replays: append-merge fields are extended, never reset.
    pub async fn run_stage(
        &self,
        kind: StageKind,
        state: &mut MeetingState,
        llm: &dyn CompletionService,
    ) -> Result<(), PipelineError> {
        let ctx = self.context(llm);
        let Some(stage) = self.stages.iter().find(|s| s.kind() == kind) else {
            return Err(PipelineError::Stage {
                stage: kind.name(),
                source: anyhow::anyhow!("stage is not part of this pipeline"),
            });
        };

        let update = stage
            .run(state, &ctx)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: kind.name(),
                source,
            })?;
        state.apply(update);
        Ok(())
    }

    fn context<'a>(&'a self, llm: &'a dyn CompletionService) -> StageContext<'a> {
        StageContext {
            llm,
            templates: &self.templates,
            config: &self.config,
        }
    }
}
