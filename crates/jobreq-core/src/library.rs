//! Default pattern library and vocabularies
//!
//! Pure data. The expressions are compiled case-insensitively by the
//! extractor's pattern matcher; anything here can be replaced through the
//! `[patterns]`, `[extraction]` and `[ner]` configuration tables.

use crate::RequirementCategory;

/// Category -> ordered list of requirement expressions
pub const DEFAULT_PATTERN_LIBRARY: &[(RequirementCategory, &[&str])] = &[
    (
        RequirementCategory::TechnicalSkill,
        &[
            r"\b(?:python|java|javascript|typescript|react|angular|vue|node\.js|rust|golang|scala|kotlin|swift|ruby|php)\b",
            r"\b(?:sql|mysql|postgresql|mongodb|redis)\b",
            r"\b(?:aws|azure|gcp|docker|kubernetes|terraform)\b",
            r"\b(?:machine learning|tensorflow|pytorch|microservices|restful apis?|rest apis?)\b",
            r"\b(?:agile|scrum|waterfall|kanban)\b",
            r"\b(?:ci/cd|devops|mlops|dataops)\b",
            r"\b(?:proficient|expert|skilled)\s+(?:in|with)\s+[\w#+-]+(?:\.[\w#+-]+)*",
            r"\b(?:knowledge|understanding|familiarity)\s+of\s+[\w#+-]+(?:\.[\w#+-]+)*",
        ],
    ),
    (
        RequirementCategory::Experience,
        &[
            r"\b\d+\+?\s*years?\s+(?:of\s+)?(?:professional\s+|relevant\s+|industry\s+)?experience\b",
            r"\b\d+\+?\s*years?\b",
            r"\b(?:senior|junior|entry|mid)[\s-]*level\b",
            r"\b(?:experience|background)\s+(?:with|in)\s+[\w#+-]+(?:\.[\w#+-]+)*",
            r"\bproven track record\b",
        ],
    ),
    (
        RequirementCategory::Education,
        &[
            r"\b(?:bachelor|master)(?:'s|’s)?\s+degree\b",
            r"\b(?:bachelor|master)(?:'s|’s)?(?:\s+degree)?\s+in\s+\w+(?:\s+(?:science|engineering|systems|technology))?",
            r"\b(?:associate|diploma)\s+degree\b",
            r"\b(?:phd|ph\.d|doctorate)\b",
        ],
    ),
    (
        RequirementCategory::Certification,
        &[
            r"\b(?:aws|azure|gcp|pmp|cissp|cka|ckad|scrum master)\s+certifi(?:ed|cation)\b",
            r"\bcertified\s+[\w-]+(?:\s+[\w-]+)?",
            r"\bcertifications?\b",
        ],
    ),
    (
        RequirementCategory::Tool,
        &[
            r"\b(?:git|github|gitlab|bitbucket|jenkins)\b",
            r"\b(?:jira|confluence|slack|trello|asana|notion|figma)\b",
        ],
    ),
    (
        RequirementCategory::SoftSkill,
        &[
            r"\b(?:leadership|management|communication|interpersonal|organizational)\s+skills\b",
            r"\b(?:teamwork|collaboration|problem[\s-]solving|analytical|critical\s+thinking)(?:\s+skills)?\b",
        ],
    ),
    (
        RequirementCategory::Other,
        &[
            r"\b(?:fluent|fluency)\s+in\s+\w+",
            r"\b(?:english|spanish|french|german|chinese|japanese|korean)\s+(?:proficiency|fluency)\b",
            r"\b(?:security clearance|willing(?:ness)? to travel)\b",
        ],
    ),
];

/// Keywords marking a sentence as requirement-bearing
pub const DEFAULT_REQUIREMENT_KEYWORDS: &[&str] = &[
    "required",
    "must",
    "should",
    "preferred",
    "desired",
    "essential",
    "necessary",
    "mandatory",
    "experience",
    "skills",
    "knowledge",
    "proficient",
    "expert",
    "skilled",
    "qualified",
    "background",
    "understanding",
    "familiarity",
    "certification",
    "degree",
    "years",
    "senior",
    "junior",
    "entry",
    "level",
];

/// Extra words that mark a list line as a requirement, on top of the
/// requirement keywords
pub const DEFAULT_LIST_ITEM_INDICATORS: &[&str] = &[
    // Technologies
    "python",
    "java",
    "aws",
    "docker",
    "kubernetes",
    "sql",
    "agile",
    "git",
    "ci/cd",
    "api",
    "machine learning",
    "tensorflow",
    "pytorch",
    "microservices",
    "monitoring",
    "security",
    "html",
    "css",
    "angular",
    // Responsibilities
    "lead",
    "mentor",
    "manage",
    "team",
    "management",
    "collaborate",
    "stakeholders",
    "ensure",
    "maintain",
    "delivery",
    "planning",
    "reviews",
    "quality",
    "reliability",
    "performance",
    "production",
    "operations",
];

/// Recognizer label -> category. Labels not listed normalize to `other`.
pub const DEFAULT_LABEL_CATEGORIES: &[(&str, RequirementCategory)] = &[
    ("SKILL", RequirementCategory::TechnicalSkill),
    ("SKILLS", RequirementCategory::TechnicalSkill),
    ("HARD_SKILL", RequirementCategory::TechnicalSkill),
    ("TECHNOLOGY", RequirementCategory::TechnicalSkill),
    ("PROGRAMMING_LANGUAGE", RequirementCategory::TechnicalSkill),
    ("FRAMEWORK", RequirementCategory::TechnicalSkill),
    ("MISC", RequirementCategory::TechnicalSkill),
    ("TOOL", RequirementCategory::Tool),
    ("SOFTWARE", RequirementCategory::Tool),
    ("PRODUCT", RequirementCategory::Tool),
    ("DEGREE", RequirementCategory::Education),
    ("EDUCATION", RequirementCategory::Education),
    ("QUALIFICATION", RequirementCategory::Education),
    ("CERTIFICATION", RequirementCategory::Certification),
    ("CERT", RequirementCategory::Certification),
    ("EXPERIENCE", RequirementCategory::Experience),
    ("DURATION", RequirementCategory::Experience),
    ("SOFT_SKILL", RequirementCategory::SoftSkill),
];

/// Hosted model used when none is configured
pub const DEFAULT_MODEL_ID: &str = "dbmdz/bert-large-cased-finetuned-conll03-english";

/// Hosted inference endpoint used when none is configured
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
