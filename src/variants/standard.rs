//! Standard marketing pipeline: analyst, strategist and creator

use crate::core::{
    AgentDefinition, Capability, ConfigDocument, ConfigStore, Pipeline, PipelineBase,
    PipelineError, PipelineVariant, TaskDefinition,
};
use crate::variants::{agent_from, require_documents, task_from, RoleDefaults, TaskDefaults};
use std::sync::Arc;
use tracing::info;

const LEAD_MARKET_ANALYST: RoleDefaults = RoleDefaults {
    role: "Lead Market Analyst",
    goal: "Conduct in-depth analysis of the market and the competition",
    backstory: "Seasoned analyst with more than ten years of market research",
};

const CHIEF_MARKETING_STRATEGIST: RoleDefaults = RoleDefaults {
    role: "Chief Marketing Strategist",
    goal: "Develop effective marketing strategies",
    backstory: "Strategist who has led campaigns at large companies",
};

const CREATIVE_CONTENT_CREATOR: RoleDefaults = RoleDefaults {
    role: "Creative Content Creator",
    goal: "Create compelling campaign content",
    backstory: "Creative writer with a broad portfolio",
};

const RESEARCH: TaskDefaults = TaskDefaults {
    description: "Analyse the market for {{ project_description }}",
    expected_output: "A detailed market analysis",
};

const PROJECT_UNDERSTANDING: TaskDefaults = TaskDefaults {
    description: "Study the project {{ project_description }}",
    expected_output: "A summary of the project and its audience",
};

const MARKETING_STRATEGY: TaskDefaults = TaskDefaults {
    description: "Develop a marketing strategy for the project",
    expected_output: "A marketing strategy with tactics, channels and KPIs",
};

const CAMPAIGN_IDEA: TaskDefaults = TaskDefaults {
    description: "Come up with campaign ideas for the project",
    expected_output: "A list of campaign ideas",
};

const COPY_CREATION: TaskDefaults = TaskDefaults {
    description: "Write marketing copy for the approved campaign ideas",
    expected_output: "Marketing copy with a title and body for each idea",
};

/// General-purpose marketing pipeline
#[derive(Debug)]
pub struct StandardPipeline {
    base: PipelineBase,
    store: Arc<ConfigStore>,
}

impl StandardPipeline {
    pub const TYPE: &'static str = "standard";

    fn agents_doc(&self) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.store.agents(self.base.config().agents_document())
    }

    fn tasks_doc(&self) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.store.tasks(self.base.config().tasks_document())
    }

    pub fn lead_market_analyst(&self) -> Result<AgentDefinition, PipelineError> {
        let doc = self.agents_doc()?;
        Ok(agent_from(&doc, "lead_market_analyst", &LEAD_MARKET_ANALYST)
            .with_capability(Capability::WebSearch)
            .with_capability(Capability::PageFetch))
    }

    pub fn chief_marketing_strategist(&self) -> Result<AgentDefinition, PipelineError> {
        let doc = self.agents_doc()?;
        Ok(
            agent_from(&doc, "chief_marketing_strategist", &CHIEF_MARKETING_STRATEGIST)
                .with_capability(Capability::WebSearch)
                .with_capability(Capability::PageFetch),
        )
    }

    pub fn creative_content_creator(&self) -> Result<AgentDefinition, PipelineError> {
        let doc = self.agents_doc()?;
        Ok(agent_from(&doc, "creative_content_creator", &CREATIVE_CONTENT_CREATOR))
    }

    pub fn research_task(&self) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(&doc, "research_task", &RESEARCH, self.lead_market_analyst()?))
    }

    pub fn project_understanding_task(&self) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(
            &doc,
            "project_understanding_task",
            &PROJECT_UNDERSTANDING,
            self.lead_market_analyst()?,
        ))
    }

    pub fn marketing_strategy_task(&self) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(
            &doc,
            "marketing_strategy_task",
            &MARKETING_STRATEGY,
            self.chief_marketing_strategist()?,
        ))
    }

    pub fn campaign_idea_task(&self) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(
            &doc,
            "campaign_idea_task",
            &CAMPAIGN_IDEA,
            self.chief_marketing_strategist()?,
        ))
    }

    pub fn copy_creation_task(&self) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(
            &doc,
            "copy_creation_task",
            &COPY_CREATION,
            self.creative_content_creator()?,
        )
        .with_dependencies(vec![
            self.marketing_strategy_task()?,
            self.campaign_idea_task()?,
        ]))
    }
}

impl Pipeline for StandardPipeline {
    fn base(&self) -> &PipelineBase {
        &self.base
    }

    fn label(&self) -> &str {
        Self::TYPE
    }

    fn validate_config(&self) -> Result<(), PipelineError> {
        require_documents(self.base.config())
    }

    fn initialize(&mut self) -> Result<(), PipelineError> {
        self.agents_doc()?;
        self.tasks_doc()?;
        info!("Using the standard agents and tasks");
        Ok(())
    }

    fn agents(&self) -> Result<Vec<AgentDefinition>, PipelineError> {
        Ok(vec![
            self.lead_market_analyst()?,
            self.chief_marketing_strategist()?,
            self.creative_content_creator()?,
        ])
    }

    fn tasks(&self) -> Result<Vec<TaskDefinition>, PipelineError> {
        Ok(vec![
            self.research_task()?,
            self.project_understanding_task()?,
            self.marketing_strategy_task()?,
            self.campaign_idea_task()?,
            self.copy_creation_task()?,
        ])
    }
}

impl PipelineVariant for StandardPipeline {
    fn from_parts(base: PipelineBase, store: Arc<ConfigStore>) -> Self {
        Self { base, store }
    }
}
