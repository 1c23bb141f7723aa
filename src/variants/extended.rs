//! Extended marketing pipeline with community, legal and technical roles

use crate::core::{
    AgentDefinition, Capability, ConfigDocument, ConfigStore, Pipeline, PipelineBase,
    PipelineError, PipelineVariant, TaskDefinition,
};
use crate::variants::{agent_from, require_documents, task_from, RoleDefaults, TaskDefaults};
use std::sync::Arc;
use tracing::info;

const MARKET_ANALYST: RoleDefaults = RoleDefaults {
    role: "Market Analyst",
    goal: "Analyse the target market",
    backstory: "Industry expert who tracks competitors and trends",
};

const STRATEGIST: RoleDefaults = RoleDefaults {
    role: "Strategist",
    goal: "Develop the marketing strategy",
    backstory: "Strategist with experience launching products",
};

const CONTENT_CREATOR: RoleDefaults = RoleDefaults {
    role: "Content Creator",
    goal: "Create campaign content",
    backstory: "Creative writer for digital channels",
};

const COMMUNITY_MANAGER: RoleDefaults = RoleDefaults {
    role: "Community Manager",
    goal: "Grow and engage the community",
    backstory: "Expert in building online communities",
};

const LEGAL_SPECIALIST: RoleDefaults = RoleDefaults {
    role: "Legal Specialist",
    goal: "Keep the campaign legally compliant",
    backstory: "Lawyer specialised in advertising and consumer law",
};

const TECHNICAL_SPECIALIST: RoleDefaults = RoleDefaults {
    role: "Technical Marketing Specialist",
    goal: "Explain the product's technical strengths",
    backstory: "Engineer turned product marketer",
};

const MARKET_RESEARCH: TaskDefaults = TaskDefaults {
    description: "Research the market for {{ project_name }}",
    expected_output: "A market analysis",
};

const AUDIENCE_ANALYSIS: TaskDefaults = TaskDefaults {
    description: "Analyse the target audience of {{ project_name }}",
    expected_output: "An audience analysis",
};

const LEGAL_RISK_ASSESSMENT: TaskDefaults = TaskDefaults {
    description: "Assess the legal risks of the campaign",
    expected_output: "A legal risk assessment",
};

const COMMUNITY_STRATEGY: TaskDefaults = TaskDefaults {
    description: "Develop a community strategy",
    expected_output: "A community strategy",
};

const MARKETING_STRATEGY: TaskDefaults = TaskDefaults {
    description: "Develop the marketing strategy",
    expected_output: "A marketing strategy",
};

const CONTENT_CREATION: TaskDefaults = TaskDefaults {
    description: "Create the campaign content",
    expected_output: "Campaign content",
};

const TECHNICAL_POSITIONING: TaskDefaults = TaskDefaults {
    description: "Position the product on its technical merits",
    expected_output: "Technical positioning",
};

const CAMPAIGN_EXECUTION: TaskDefaults = TaskDefaults {
    description: "Plan the execution of the campaign",
    expected_output: "A campaign execution plan",
};

/// Marketing pipeline with a wider set of specialists
#[derive(Debug)]
pub struct ExtendedPipeline {
    base: PipelineBase,
    store: Arc<ConfigStore>,
}

impl ExtendedPipeline {
    pub const TYPE: &'static str = "extended";

    fn agents_doc(&self) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.store.agents(self.base.config().agents_document())
    }

    fn tasks_doc(&self) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.store.tasks(self.base.config().tasks_document())
    }

    fn agent(&self, key: &str, defaults: &RoleDefaults) -> Result<AgentDefinition, PipelineError> {
        let doc = self.agents_doc()?;
        Ok(agent_from(&doc, key, defaults))
    }

    fn task(
        &self,
        key: &str,
        defaults: &TaskDefaults,
        agent: AgentDefinition,
    ) -> Result<TaskDefinition, PipelineError> {
        let doc = self.tasks_doc()?;
        Ok(task_from(&doc, key, defaults, agent))
    }

    pub fn market_analyst(&self) -> Result<AgentDefinition, PipelineError> {
        Ok(self
            .agent("market_analyst", &MARKET_ANALYST)?
            .with_capability(Capability::WebSearch)
            .with_capability(Capability::PageFetch))
    }

    pub fn strategist(&self) -> Result<AgentDefinition, PipelineError> {
        self.agent("strategist", &STRATEGIST)
    }

    pub fn content_creator(&self) -> Result<AgentDefinition, PipelineError> {
        self.agent("content_creator", &CONTENT_CREATOR)
    }

    pub fn community_manager(&self) -> Result<AgentDefinition, PipelineError> {
        self.agent("community_manager", &COMMUNITY_MANAGER)
    }

    pub fn legal_specialist(&self) -> Result<AgentDefinition, PipelineError> {
        Ok(self
            .agent("legal_specialist", &LEGAL_SPECIALIST)?
            .with_capability(Capability::WebSearch))
    }

    pub fn technical_specialist(&self) -> Result<AgentDefinition, PipelineError> {
        self.agent("technical_specialist", &TECHNICAL_SPECIALIST)
    }

    pub fn market_research_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task("market_research_task", &MARKET_RESEARCH, self.market_analyst()?)
    }

    pub fn audience_analysis_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task("audience_analysis_task", &AUDIENCE_ANALYSIS, self.market_analyst()?)
    }

    pub fn legal_risk_assessment_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task(
            "legal_risk_assessment_task",
            &LEGAL_RISK_ASSESSMENT,
            self.legal_specialist()?,
        )
    }

    pub fn community_strategy_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task(
            "community_strategy_task",
            &COMMUNITY_STRATEGY,
            self.community_manager()?,
        )
    }

    pub fn marketing_strategy_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task("marketing_strategy_task", &MARKETING_STRATEGY, self.strategist()?)
    }

    pub fn content_creation_task(&self) -> Result<TaskDefinition, PipelineError> {
        self.task("content_creation_task", &CONTENT_CREATION, self.content_creator()?)
    }

    pub fn technical_positioning_task(&self) -> Result<TaskDefinition, PipelineError> {
        Ok(self
            .task(
                "technical_positioning_task",
                &TECHNICAL_POSITIONING,
                self.content_creator()?,
            )?
            .with_dependencies(vec![
                self.marketing_strategy_task()?,
                self.content_creation_task()?,
            ]))
    }

    pub fn campaign_execution_task(&self) -> Result<TaskDefinition, PipelineError> {
        Ok(self
            .task("campaign_execution_task", &CAMPAIGN_EXECUTION, self.strategist()?)?
            .with_dependencies(vec![
                self.marketing_strategy_task()?,
                self.legal_risk_assessment_task()?,
                self.community_strategy_task()?,
            ]))
    }
}

impl Pipeline for ExtendedPipeline {
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
        info!("Using the extended agents and tasks");
        Ok(())
    }

    fn agents(&self) -> Result<Vec<AgentDefinition>, PipelineError> {
        Ok(vec![
            self.market_analyst()?,
            self.strategist()?,
            self.content_creator()?,
            self.community_manager()?,
            self.legal_specialist()?,
            self.technical_specialist()?,
        ])
    }

    fn tasks(&self) -> Result<Vec<TaskDefinition>, PipelineError> {
        Ok(vec![
            self.market_research_task()?,
            self.audience_analysis_task()?,
            self.legal_risk_assessment_task()?,
            self.community_strategy_task()?,
            self.marketing_strategy_task()?,
            self.content_creation_task()?,
            self.technical_positioning_task()?,
            self.campaign_execution_task()?,
        ])
    }
}

impl PipelineVariant for ExtendedPipeline {
    fn from_parts(base: PipelineBase, store: Arc<ConfigStore>) -> Self {
        Self { base, store }
    }
}
