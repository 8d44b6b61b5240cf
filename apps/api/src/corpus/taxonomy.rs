//! Canonical skill taxonomy: domain → sub-domain → skill.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillDefinition {
    pub skill_id: &'static str,
    pub domain: &'static str,
    pub sub_domain: &'static str,
    pub canonical_name: &'static str,
    pub description: &'static str,
    pub keyword_synonyms: &'static [&'static str],
    /// Relative importance. Informational, not used in scoring.
    pub weight: f64,
}

impl SkillDefinition {
    /// Text embedded for the skill: name, description and synonyms.
    pub fn content(&self) -> String {
        format!(
            "NAME: {}\nDESCRIPTION: {}\nRELATED TERMS/SYNONYMS: {}",
            self.canonical_name,
            self.description,
            self.keyword_synonyms.join(", ")
        )
    }
}

pub fn skills_in_domain(domain: &str) -> impl Iterator<Item = &'static SkillDefinition> + '_ {
    SKILL_TAXONOMY.iter().filter(move |s| s.domain == domain)
}

pub static SKILL_TAXONOMY: &[SkillDefinition] = &[
    // TECH / DATA_ANALYST: reporting, metrics, data cleanup
    SkillDefinition {
        skill_id: "CAN_ANALYTICS_TOOLS",
        domain: "TECH",
        sub_domain: "DATA_ANALYST",
        canonical_name: "Business Intelligence and Reporting Tools",
        description: "Expertise in data visualization, dashboard creation, and using BI platforms.",
        keyword_synonyms: &[
            "Tableau",
            "Power BI",
            "Looker",
            "Excel",
            "Spreadsheets",
            "Data Visualization",
            "Reporting",
            "Metrics",
        ],
        weight: 0.9,
    },
    SkillDefinition {
        skill_id: "CAN_DB_SQL_DA",
        domain: "TECH",
        sub_domain: "DATA_ANALYST",
        canonical_name: "SQL for Data Retrieval and Analysis",
        description: "Strong skills in writing complex SQL queries for data extraction and preliminary analysis.",
        keyword_synonyms: &[
            "SQL",
            "PostgreSQL",
            "MySQL",
            "Data Extraction",
            "Query Optimization",
            "Data Retrieval",
        ],
        weight: 0.8,
    },
    SkillDefinition {
        skill_id: "CAN_PYTHON_SCRIPTING",
        domain: "TECH",
        sub_domain: "DATA_ANALYST",
        canonical_name: "Basic Python/R for Data Manipulation",
        description: "Familiarity with Python or R for data cleaning and manipulation tasks.",
        keyword_synonyms: &[
            "Python",
            "R",
            "Pandas",
            "data manipulation",
            "scripting",
            "data cleaning",
        ],
        weight: 0.7,
    },
    // TECH / ML_ENGINEER: production, MLOps, deployment
    SkillDefinition {
        skill_id: "CAN_CLOUD_M_PROD",
        domain: "TECH",
        sub_domain: "ML_ENGINEER",
        canonical_name: "MLOps and Production Deployment",
        description: "Experience building end-to-end ML pipelines, model serving, monitoring, and MLOps tools.",
        keyword_synonyms: &[
            "MLOps",
            "Kubeflow",
            "Airflow",
            "MLFlow",
            "Model Deployment",
            "Production ML",
            "CI/CD for ML",
        ],
        weight: 1.0,
    },
    SkillDefinition {
        skill_id: "CAN_K8S_ORCHESTRATION",
        domain: "TECH",
        sub_domain: "ML_ENGINEER",
        canonical_name: "Container and Kubernetes Orchestration",
        description: "Deep knowledge of Docker and Kubernetes for microservices and scalable ML model serving.",
        keyword_synonyms: &[
            "Kubernetes",
            "K8s",
            "Docker",
            "Containers",
            "DevOps orchestration",
            "Helm",
        ],
        weight: 0.95,
    },
    SkillDefinition {
        skill_id: "CAN_PYTHON_ENG",
        domain: "TECH",
        sub_domain: "ML_ENGINEER",
        canonical_name: "Production-Ready Python and Software Engineering",
        description: "Expertise in writing clean, tested, and high-performance Python code for systems integration.",
        keyword_synonyms: &[
            "Python",
            "Software Engineering",
            "Unit Testing",
            "TDD",
            "Clean Code",
            "Microservices (Python)",
        ],
        weight: 0.9,
    },
    // TECH / AI_ENGINEER: generative AI, LLMs, NLP
    SkillDefinition {
        skill_id: "CAN_NLP_LLMS",
        domain: "TECH",
        sub_domain: "AI_ENGINEER",
        canonical_name: "Natural Language Processing and Large Language Models",
        description: "Expertise in NLP techniques, Transformer models, prompt engineering, and LLM fine-tuning.",
        keyword_synonyms: &[
            "NLP",
            "LLMs",
            "Generative AI",
            "Transformers",
            "BERT",
            "GPT",
            "Prompt Engineering",
            "Fine-tuning",
        ],
        weight: 1.0,
    },
    SkillDefinition {
        skill_id: "CAN_RAG_VECTORS",
        domain: "TECH",
        sub_domain: "AI_ENGINEER",
        canonical_name: "RAG and Vector Databases",
        description: "Experience building Retrieval-Augmented Generation (RAG) systems using vector databases.",
        keyword_synonyms: &[
            "RAG",
            "Vector Database",
            "Pinecone",
            "Milvus",
            "Vectorization",
            "LangChain",
            "LlamaIndex",
        ],
        weight: 0.95,
    },
    SkillDefinition {
        skill_id: "CAN_DATA_SCALING",
        domain: "TECH",
        sub_domain: "AI_ENGINEER",
        canonical_name: "Data Scaling and Distributed Computing",
        description: "Proficiency in tools and concepts for processing large-scale data for model training.",
        keyword_synonyms: &["Spark", "PySpark", "Hadoop", "Distributed Computing", "Big Data"],
        weight: 0.8,
    },
    // TECH / SOFTWARE_ENGINEER
    SkillDefinition {
        skill_id: "CAN_JAVA_BACKEND",
        domain: "TECH",
        sub_domain: "SOFTWARE_ENGINEER",
        canonical_name: "Java Spring Boot Backend Development",
        description: "Proficiency in modern Java and the Spring Boot framework for building robust, scalable backend services.",
        keyword_synonyms: &[
            "Java",
            "Spring Boot",
            "REST API",
            "Microservices",
            "OOP",
            "Backend",
            "Spring Cloud",
        ],
        weight: 0.9,
    },
    SkillDefinition {
        skill_id: "CAN_FRONTEND_REACT",
        domain: "TECH",
        sub_domain: "SOFTWARE_ENGINEER",
        canonical_name: "Modern React Frontend Development",
        description: "Proficiency in modern JavaScript and React frameworks for building user interfaces.",
        keyword_synonyms: &[
            "React",
            "Redux",
            "Hooks",
            "JavaScript",
            "TypeScript",
            "Frontend",
            "UI/UX",
            "Next.js",
        ],
        weight: 0.8,
    },
    SkillDefinition {
        skill_id: "CAN_CICD_DEVOPS",
        domain: "TECH",
        sub_domain: "SOFTWARE_ENGINEER",
        canonical_name: "CI/CD and Testing",
        description: "Experience with continuous integration/continuous deployment pipelines and automated testing practices.",
        keyword_synonyms: &[
            "CI/CD",
            "Jenkins",
            "GitLab CI",
            "GitHub Actions",
            "Unit Testing",
            "TDD",
            "Integration Testing",
        ],
        weight: 0.7,
    },
    // HR / GENERAL_HR
    SkillDefinition {
        skill_id: "CAN_HR_FMLA_COMPLIANCE",
        domain: "HR",
        sub_domain: "GENERAL_HR",
        canonical_name: "FMLA/EEO/FLSA Compliance",
        description: "Expertise in federal and state labor laws, including FMLA, Equal Employment Opportunity, and Fair Labor Standards Act.",
        keyword_synonyms: &["FMLA", "EEO", "FLSA", "Compliance", "Labor Law", "HR regulations"],
        weight: 1.0,
    },
    SkillDefinition {
        skill_id: "CAN_HR_RECRUITMENT_LIFECYCLE",
        domain: "HR",
        sub_domain: "GENERAL_HR",
        canonical_name: "Full-Cycle Recruitment Management",
        description: "Ability to manage the entire hiring process from sourcing to offer letter and onboarding.",
        keyword_synonyms: &[
            "Recruitment",
            "Sourcing",
            "Applicant Tracking Systems",
            "ATS",
            "Onboarding",
            "Talent Acquisition",
        ],
        weight: 0.8,
    },
    SkillDefinition {
        skill_id: "CAN_HR_BENEFIT_ADMIN",
        domain: "HR",
        sub_domain: "GENERAL_HR",
        canonical_name: "Benefits and Compensation Administration",
        description: "Experience managing employee benefits packages, compensation strategies, and payroll coordination.",
        keyword_synonyms: &[
            "Benefit Administration",
            "Compensation",
            "Payroll",
            "401k",
            "Health Insurance",
            "Total Rewards",
        ],
        weight: 0.7,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_skill_ids_are_unique() {
        let ids: HashSet<&str> = SKILL_TAXONOMY.iter().map(|s| s.skill_id).collect();
        assert_eq!(ids.len(), SKILL_TAXONOMY.len());
    }

    #[test]
    fn test_taxonomy_covers_both_domains() {
        assert_eq!(skills_in_domain("TECH").count(), 12);
        assert_eq!(skills_in_domain("HR").count(), 3);
        assert_eq!(skills_in_domain("FINANCE").count(), 0);
    }

    #[test]
    fn test_every_skill_is_well_formed() {
        for skill in SKILL_TAXONOMY {
            assert!(skill.skill_id.starts_with("CAN_"), "{}", skill.skill_id);
            assert!(!skill.keyword_synonyms.is_empty(), "{}", skill.skill_id);
            assert!((0.0..=1.0).contains(&skill.weight), "{}", skill.skill_id);
        }
    }

    #[test]
    fn test_content_is_name_description_and_synonyms() {
        let rag = SKILL_TAXONOMY
            .iter()
            .find(|s| s.skill_id == "CAN_RAG_VECTORS")
            .unwrap();
        let content = rag.content();
        assert_eq!(
            content,
            "NAME: RAG and Vector Databases\n\
             DESCRIPTION: Experience building Retrieval-Augmented Generation (RAG) systems using vector databases.\n\
             RELATED TERMS/SYNONYMS: RAG, Vector Database, Pinecone, Milvus, Vectorization, LangChain, LlamaIndex"
        );
        assert!(!content.contains("CAN_RAG_VECTORS"));
    }
}
