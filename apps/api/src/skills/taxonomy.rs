//! Skills taxonomy: canonical skill names, their aliases, and scoring categories.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse grouping used to weight skills in the coverage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    Frontend,
    Backend,
    Databases,
    CloudDevops,
    DataMl,
    NlpLlm,
    MonitoringAnalytics,
    TestingPractices,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 10] = [
        SkillCategory::Languages,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Databases,
        SkillCategory::CloudDevops,
        SkillCategory::DataMl,
        SkillCategory::NlpLlm,
        SkillCategory::MonitoringAnalytics,
        SkillCategory::TestingPractices,
        SkillCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Languages => "Languages",
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Databases => "Databases",
            SkillCategory::CloudDevops => "Cloud & DevOps",
            SkillCategory::DataMl => "Data / ML / MLOps",
            SkillCategory::NlpLlm => "NLP / LLM",
            SkillCategory::MonitoringAnalytics => "Monitoring / Analytics",
            SkillCategory::TestingPractices => "Testing / Practices",
            SkillCategory::Other => "Other",
        }
    }

    /// Relative importance of a category in the coverage score.
    pub fn weight(&self) -> f64 {
        match self {
            SkillCategory::Languages => 1.0,
            SkillCategory::Frontend => 0.8,
            SkillCategory::Backend => 1.0,
            SkillCategory::Databases => 0.9,
            SkillCategory::CloudDevops => 1.1,
            SkillCategory::DataMl => 1.1,
            SkillCategory::NlpLlm => 1.0,
            SkillCategory::MonitoringAnalytics => 0.6,
            SkillCategory::TestingPractices => 0.7,
            SkillCategory::Other => 1.0,
        }
    }
}

/// A canonical skill and the variants that count as mentioning it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub canonical: String,
    #[serde(default = "default_category")]
    pub category: SkillCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Ubiquitous skills (Git, Agile...) that nearly every JD lists; down-weighted when scoring.
    #[serde(default)]
    pub common: bool,
}

fn default_category() -> SkillCategory {
    SkillCategory::Other
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse taxonomy file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("taxonomy entry has an empty canonical name")]
    EmptyName,
}

#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    skills: Vec<Skill>,
    /// lowercase canonical or alias → index into `skills`
    lookup: HashMap<String, usize>,
}

impl SkillTaxonomy {
    /// The built-in taxonomy.
    pub fn builtin() -> Self {
        let skills = BUILTIN
            .iter()
            .map(|(canonical, category, aliases)| Skill {
                canonical: canonical.to_string(),
                category: *category,
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
                common: COMMON_SKILLS.contains(canonical),
            })
            .collect();
        Self::from_skills(skills)
    }

    /// Merges extra skills into this taxonomy. An entry whose canonical name already
    /// exists extends that skill's aliases; anything else is appended.
    pub fn merge(mut self, extra: Vec<Skill>) -> Result<Self, TaxonomyError> {
        for skill in extra {
            let canonical = skill.canonical.trim().to_string();
            if canonical.is_empty() {
                return Err(TaxonomyError::EmptyName);
            }
            let existing = self
                .skills
                .iter()
                .position(|s| s.canonical.eq_ignore_ascii_case(&canonical));
            match existing {
                Some(idx) => {
                    let target = &mut self.skills[idx];
                    for alias in skill.aliases {
                        if !target.aliases.iter().any(|a| a.eq_ignore_ascii_case(&alias)) {
                            target.aliases.push(alias);
                        }
                    }
                    target.common |= skill.common;
                }
                None => self.skills.push(Skill { canonical, ..skill }),
            }
        }
        Ok(Self::from_skills(self.skills))
    }

    /// Loads a JSON array of skills from `path` and merges it into the built-in taxonomy.
    pub fn builtin_with_file(path: &Path) -> Result<Self, TaxonomyError> {
        let raw = std::fs::read_to_string(path)?;
        let extra: Vec<Skill> = serde_json::from_str(&raw)?;
        Self::builtin().merge(extra)
    }

    fn from_skills(skills: Vec<Skill>) -> Self {
        let mut lookup = HashMap::new();
        // Canonical names first so an alias never shadows another skill's canonical name.
        for (idx, skill) in skills.iter().enumerate() {
            lookup.entry(skill.canonical.to_lowercase()).or_insert(idx);
        }
        for (idx, skill) in skills.iter().enumerate() {
            for alias in &skill.aliases {
                lookup.entry(alias.to_lowercase()).or_insert(idx);
            }
        }
        Self { skills, lookup }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Maps a canonical name or alias (any case) to its skill.
    pub fn lookup(&self, name: &str) -> Option<&Skill> {
        self.lookup
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.skills[idx])
    }

    /// Canonical name for `name`, or `name` itself when the taxonomy doesn't know it.
    pub fn canonicalize(&self, name: &str) -> String {
        self.lookup(name)
            .map(|s| s.canonical.clone())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn category_of(&self, name: &str) -> SkillCategory {
        self.lookup(name)
            .map(|s| s.category)
            .unwrap_or(SkillCategory::Other)
    }

    pub fn is_common(&self, name: &str) -> bool {
        self.lookup(name).map(|s| s.common).unwrap_or(false)
    }
}

const COMMON_SKILLS: &[&str] = &[
    "Git",
    "Debugging",
    "Agile/Scrum",
    "Unit Testing",
    "HTML5",
    "CSS3",
    "Bash",
    "REST APIs",
];

use SkillCategory::*;

#[rustfmt::skip]
const BUILTIN: &[(&str, SkillCategory, &[&str])] = &[
    // Languages
    ("Python", Languages, &["py"]),
    ("Java", Languages, &[]),
    ("JavaScript", Languages, &["js", "vanilla js"]),
    ("TypeScript", Languages, &["ts"]),
    ("SQL", Languages, &["postgres sql", "t-sql", "pl/sql", "structured query language"]),
    ("Bash", Languages, &["shell", "sh"]),
    ("C", Languages, &[]),
    ("C++", Languages, &["cpp"]),
    ("Golang", Languages, &[]),
    ("Rust", Languages, &[]),

    // Frontend
    ("React.js", Frontend, &["react", "reactjs"]),
    ("React Native", Frontend, &["react-native"]),
    ("Next.js", Frontend, &["nextjs"]),
    ("Redux", Frontend, &[]),
    ("AngularJS", Frontend, &["angular", "angular.js"]),
    ("HTML5", Frontend, &["html"]),
    ("CSS3", Frontend, &["css"]),
    ("Bootstrap", Frontend, &[]),
    ("Figma", Frontend, &[]),
    ("D3.js", Frontend, &["d3"]),

    // Backend
    ("Node.js", Backend, &["node", "nodejs"]),
    ("Express.js", Backend, &["express", "expressjs"]),
    ("Spring Boot", Backend, &["springboot", "spring-boot", "spring"]),
    ("FastAPI", Backend, &[]),
    ("Flask", Backend, &[]),
    ("REST APIs", Backend, &["rest", "restful api", "rest api"]),
    ("Microservices Architecture", Backend, &["microservices", "service oriented", "soa"]),
    ("GraphQL", Backend, &[]),

    // Databases
    ("PostgreSQL", Databases, &["postgres", "psql"]),
    ("MySQL", Databases, &[]),
    ("MongoDB", Databases, &["mongo"]),
    ("SQLite", Databases, &[]),
    ("Redis", Databases, &[]),
    ("Oracle", Databases, &["oracle db", "oracle database"]),
    ("Redshift", Databases, &[]),
    ("BigQuery", Databases, &["google bigquery", "gcp bigquery"]),
    ("Cassandra", Databases, &[]),
    ("DynamoDB", Databases, &[]),
    ("Vector Databases", Databases, &["vector db", "vectorstore"]),
    ("FAISS", Databases, &[]),
    ("Pinecone", Databases, &[]),
    ("Weaviate", Databases, &[]),

    // Cloud & DevOps
    ("AWS", CloudDevops, &["amazon web services"]),
    ("Azure", CloudDevops, &[]),
    ("Google Cloud Platform", CloudDevops, &["gcp", "google cloud"]),
    ("AWS EC2", CloudDevops, &["ec2"]),
    ("AWS S3", CloudDevops, &["s3"]),
    ("AWS RDS", CloudDevops, &["rds"]),
    ("AWS Lambda", CloudDevops, &["lambda"]),
    ("IAM", CloudDevops, &["aws iam"]),
    ("CloudWatch", CloudDevops, &[]),
    ("Docker", CloudDevops, &[]),
    ("Kubernetes", CloudDevops, &["k8s"]),
    ("EKS", CloudDevops, &[]),
    ("ECS", CloudDevops, &[]),
    ("Terraform", CloudDevops, &["iac terraform"]),
    ("Jenkins", CloudDevops, &[]),
    ("Git", CloudDevops, &[]),
    ("GitHub Actions", CloudDevops, &["gha", "github actions ci"]),
    ("Ansible", CloudDevops, &[]),
    ("CI/CD", CloudDevops, &["cicd", "ci cd"]),
    ("VPC", CloudDevops, &[]),

    // Data / ML / MLOps
    ("Scikit-learn", DataMl, &["sklearn"]),
    ("PyTorch", DataMl, &["pytorch lightning", "torch"]),
    ("TensorFlow", DataMl, &["tf"]),
    ("MLflow", DataMl, &[]),
    ("TorchServe", DataMl, &[]),
    ("TensorFlow Serving", DataMl, &[]),
    ("Feature Stores", DataMl, &["feature store", "feast"]),
    ("Data Modeling", DataMl, &["data model"]),
    ("ETL", DataMl, &["elt", "extract transform load"]),
    ("Data Warehousing", DataMl, &["data warehouse", "dw"]),
    ("Airflow", DataMl, &["apache airflow"]),
    ("Spark", DataMl, &["apache spark", "pyspark"]),
    ("Kafka", DataMl, &["apache kafka"]),
    ("Data Quality", DataMl, &["dq"]),
    ("Data Governance", DataMl, &[]),
    ("Streaming", DataMl, &["stream processing", "real time streaming", "realtime"]),
    ("Kinesis", DataMl, &[]),
    ("PubSub", DataMl, &["pub/sub", "google pubsub"]),
    ("RabbitMQ", DataMl, &[]),
    ("Pandas", DataMl, &[]),
    ("NumPy", DataMl, &[]),

    // NLP / LLM
    ("Natural Language Processing", NlpLlm, &["nlp"]),
    ("Large Language Models", NlpLlm, &["llm", "llms", "foundation models"]),
    ("Hugging Face Transformers", NlpLlm, &["transformers", "huggingface"]),
    ("OpenAI APIs", NlpLlm, &["openai", "gpt api"]),
    ("LangChain", NlpLlm, &[]),
    ("RAG Pipelines", NlpLlm, &["rag"]),
    ("Prompt Engineering", NlpLlm, &["prompting"]),
    ("BERT", NlpLlm, &[]),
    ("RoBERTa", NlpLlm, &[]),
    ("GPT", NlpLlm, &["gpt-4", "gpt4", "gpt-3.5"]),

    // Monitoring / Analytics
    ("Amazon CloudWatch", MonitoringAnalytics, &[]),
    ("Prometheus", MonitoringAnalytics, &[]),
    ("Grafana", MonitoringAnalytics, &[]),
    ("ELK Stack", MonitoringAnalytics, &["elk", "elasticsearch logstash kibana"]),
    ("Elasticsearch", MonitoringAnalytics, &[]),
    ("Logstash", MonitoringAnalytics, &[]),
    ("Kibana", MonitoringAnalytics, &[]),
    ("Tableau", MonitoringAnalytics, &[]),
    ("Power BI", MonitoringAnalytics, &["powerbi"]),

    // Testing / Practices
    ("Unit Testing", TestingPractices, &["unit tests"]),
    ("Integration Testing", TestingPractices, &["integration tests"]),
    ("Debugging", TestingPractices, &[]),
    ("TDD", TestingPractices, &["test driven development"]),
    ("Agile/Scrum", TestingPractices, &["agile", "scrum"]),
    ("Jest", TestingPractices, &[]),
    ("Cypress", TestingPractices, &[]),
    ("JUnit", TestingPractices, &[]),
    ("Mockito", TestingPractices, &[]),
    ("A/B Testing", TestingPractices, &["ab testing", "a b testing"]),
    ("Experiment Tracking", TestingPractices, &["exp tracking"]),
];
