//! Static extraction dictionaries.
//!
//! These tables are plain data, injected into the extractor constructors so
//! tests (or a deployment with different markets) can substitute their own
//! without touching extractor logic.

use jobsift_shared::Seniority;

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// Canonical skill dictionary: languages, frameworks, cloud, tools.
pub const SKILL_KEYWORDS: &[&str] = &[
    // Languages
    "Python", "JavaScript", "TypeScript", "Java", "C++", "C#", "Go", "Rust", "Ruby", "PHP",
    "Swift", "Kotlin", "Dart", "Scala", "Elixir", "Haskell", "Lua", "Perl", "R", "Julia",
    "Bash", "Shell", "PowerShell", "SQL", "HTML", "CSS", "Sass", "Less",
    // Web frameworks
    "Django", "Flask", "FastAPI", "React", "Angular", "Vue.js", "Next.js", "Nuxt.js",
    "Svelte", "Node.js", "Express", "NestJS", "Spring Boot", "ASP.NET", ".NET Core",
    "Laravel", "Symfony", "Ruby on Rails", "Phoenix", "jQuery", "Bootstrap", "Tailwind CSS",
    // Mobile
    "React Native", "Flutter", "Android", "iOS", "SwiftUI", "Jetpack Compose", "Xamarin", "Ionic",
    // Databases & storage
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch", "Cassandra", "MariaDB",
    "SQLite", "DynamoDB", "Cosmos DB", "Neo4j", "Oracle", "SQL Server", "Firebase", "Supabase",
    // Cloud & DevOps
    "AWS", "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes", "Terraform", "Ansible",
    "Jenkins", "GitLab CI", "GitHub Actions", "CircleCI", "Travis CI", "Puppet", "Chef",
    "Prometheus", "Grafana", "Datadog", "New Relic", "Splunk", "ELK Stack", "Nginx", "Apache",
    // AI & data
    "Machine Learning", "Deep Learning", "Data Science", "Artificial Intelligence", "NLP",
    "Computer Vision", "TensorFlow", "PyTorch", "Keras", "Scikit-learn", "Pandas", "NumPy",
    "Matplotlib", "Seaborn", "OpenCV", "Hugging Face", "LLM", "Generative AI", "Spark", "Hadoop",
    "Airflow", "Databricks", "Snowflake", "BigQuery", "Redshift", "Tableau", "Power BI",
    // Tools & concepts
    "Git", "GitHub", "GitLab", "Bitbucket", "Jira", "Confluence", "Slack", "Trello", "Asana",
    "Agile", "Scrum", "Kanban", "TDD", "BDD", "CI/CD", "REST API", "GraphQL", "gRPC",
    "WebSockets", "Microservices", "Serverless", "Linux", "Unix", "Ubuntu", "CentOS",
];

/// Phrases that mark a nearby skill mention as not actually required.
pub const NEGATION_PHRASES: &[&str] = &[
    "no experience",
    "not required",
    "not mandatory",
    "no knowledge",
    "don't need",
    "without experience",
    "no prior experience",
    "is a plus",
    "would be an asset",
    "desirable but not",
    "advantageous",
];

// ---------------------------------------------------------------------------
// Seniority
// ---------------------------------------------------------------------------

/// Tier patterns in classification priority order. Entries are regex
/// fragments (word boundaries are added at compile time), so `sr\.` style
/// abbreviations work as written.
pub const SENIORITY_TIERS: &[(Seniority, &[&str])] = &[
    (
        Seniority::Lead,
        &[
            "lead", "principal", "head of", "manager", "director", "vp", "chief", "architect",
            "founding", "staff engineer",
        ],
    ),
    (
        Seniority::Senior,
        &["senior", r"sr\.", "sr ", "expert", "advanced", "experienced"],
    ),
    (
        Seniority::Junior,
        &[
            "junior",
            r"jr\.",
            "jr ",
            "entry level",
            "entry-level",
            "graduate",
            "intern",
            "internship",
            "trainee",
            "apprentice",
            "associate",
        ],
    ),
    (
        Seniority::MidLevel,
        &["mid-level", "mid level", "intermediate", "medior"],
    ),
];

// ---------------------------------------------------------------------------
// Salary
// ---------------------------------------------------------------------------

/// Currency markers in detection priority order. Matching is case-sensitive:
/// "Europe" must not read as EUR.
pub const CURRENCY_MARKERS: &[(&str, &[&str])] = &[
    ("EUR", &["€", "EUR"]),
    ("GBP", &["£", "GBP"]),
    ("PLN", &["zł", "PLN"]),
];

/// Currency assumed when no marker is found.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Symbols/codes that count as currency adjacency for a candidate number.
pub const CURRENCY_SYMBOLS: &[&str] = &["€", "£", "$", "zł", "EUR", "GBP", "PLN", "USD"];

/// Pay-period keywords and their annualization multipliers
/// (hourly assumes 40h × 52 weeks, daily 5d × 52 weeks).
pub const SALARY_PERIODS: &[(&str, i64)] = &[
    ("per year", 1),
    ("per annum", 1),
    ("a year", 1),
    ("annually", 1),
    ("yearly", 1),
    ("/year", 1),
    ("p.a.", 1),
    ("per month", 12),
    ("a month", 12),
    ("monthly", 12),
    ("/month", 12),
    ("per hour", 2080),
    ("an hour", 2080),
    ("hourly", 2080),
    ("/hour", 2080),
    ("/hr", 2080),
    ("per day", 260),
    ("a day", 260),
    ("daily", 260),
    ("/day", 260),
];

/// Terms after a number that mark it as a count, not a salary
/// ("250,000 registered users", "401k matching").
pub const SALARY_IGNORE_TERMS: &[&str] = &[
    "users",
    "employees",
    "downloads",
    "followers",
    "customers",
    "subscribers",
    "members",
    "clients",
    "visitors",
    "applicants",
    "installs",
    "stars",
    "views",
    "people",
    "retirement",
    "matching",
    "pension",
    "contribution",
];

/// Terms near a number that mark it as salary-related.
pub const SALARY_HINT_TERMS: &[&str] = &[
    "salary",
    "compensation",
    "comp",
    "pay",
    "paying",
    "base",
    "per year",
    "per annum",
    "annually",
    "yearly",
    "per month",
    "monthly",
    "per hour",
    "hourly",
    "per day",
    "daily",
    "wage",
    "remuneration",
    "gross",
    "earn",
];
