//! Optional demo data, loaded at startup when `SEED_DEMO_DATA` is set.

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use std::collections::BTreeMap;

use crate::db::{education as education_db, experiences as experience_db};
use crate::db::{portfolio as portfolio_db, projects as project_db, skills as skill_db};
use crate::models::education::CreateEducation;
use crate::models::experiences::CreateExperience;
use crate::models::portfolio::{self, CreatePortfolio, SocialLinks};
use crate::models::projects::{CreateProject, Technologies};
use crate::models::skills::{self, CreateSkill};

/// `(name, category, is_popular)`
pub const SKILL_CATALOG: &[(&str, &str, bool)] = &[
    ("JavaScript", "Programming Language", true),
    ("TypeScript", "Programming Language", true),
    ("Python", "Programming Language", true),
    ("PHP", "Programming Language", true),
    ("Java", "Programming Language", false),
    ("C#", "Programming Language", false),
    ("Go", "Programming Language", false),
    ("Rust", "Programming Language", false),
    ("React", "Frontend Framework", true),
    ("Vue.js", "Frontend Framework", true),
    ("Angular", "Frontend Framework", false),
    ("Svelte", "Frontend Framework", false),
    ("Next.js", "Frontend Framework", true),
    ("Node.js", "Backend Framework", true),
    ("Laravel", "Backend Framework", true),
    ("Express.js", "Backend Framework", true),
    ("Django", "Backend Framework", false),
    ("Spring Boot", "Backend Framework", false),
    ("MySQL", "Database", true),
    ("PostgreSQL", "Database", true),
    ("MongoDB", "Database", true),
    ("Redis", "Database", false),
    ("SQLite", "Database", false),
    ("AWS", "Cloud Platform", true),
    ("Google Cloud", "Cloud Platform", false),
    ("Azure", "Cloud Platform", false),
    ("Docker", "DevOps", true),
    ("Kubernetes", "DevOps", false),
    ("CI/CD", "DevOps", false),
    ("Figma", "Design Tool", true),
    ("Adobe XD", "Design Tool", false),
    ("Sketch", "Design Tool", false),
    ("UI/UX Design", "Design Skill", true),
    ("Prototyping", "Design Skill", false),
    ("User Research", "Design Skill", false),
    ("Machine Learning", "Data Science", true),
    ("TensorFlow", "Data Science", false),
    ("Pandas", "Data Science", false),
    ("Scikit-learn", "Data Science", false),
    ("Data Analysis", "Data Science", false),
    ("GraphQL", "API Technology", false),
    ("REST API", "API Technology", true),
    ("Git", "Version Control", true),
    ("GitHub", "Version Control", true),
];

pub struct DemoPortfolio {
    name: &'static str,
    title: &'static str,
    email: &'static str,
    phone: &'static str,
    location: &'static str,
    bio: &'static str,
    profile_image: &'static str,
    links: &'static [(&'static str, &'static str)],
    skills: &'static [&'static str],
    /// `(company, position, start, end)`; no end means a current role.
    experiences: &'static [(&'static str, &'static str, &'static str, Option<&'static str>)],
    /// `(title, description, technologies)`
    projects: &'static [(&'static str, &'static str, &'static [&'static str])],
    /// `(institution, degree, field, start, end, gpa)`
    education: &'static [(&'static str, &'static str, &'static str, &'static str, &'static str, &'static str)],
}

pub const DEMO_PORTFOLIOS: &[DemoPortfolio] = &[
    DemoPortfolio {
        name: "Ahmad Rizki Pratama",
        title: "Full Stack Developer",
        email: "ahmad.rizki@email.com",
        phone: "+62 812-3456-7890",
        location: "Jakarta, Indonesia",
        bio: "Full stack developer building modern web applications with React, Node.js and cloud tooling.",
        profile_image: "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=400",
        links: &[
            ("github", "https://github.com/ahmadrizki"),
            ("linkedin", "https://linkedin.com/in/ahmadrizkipratama"),
        ],
        skills: &["React", "Node.js", "TypeScript", "PostgreSQL", "AWS", "Docker"],
        experiences: &[
            ("PT Teknologi Digital", "Senior Full Stack Developer", "2022-01-01", None),
            ("Startup Innovation", "Frontend Developer", "2020-06-01", Some("2021-12-31")),
        ],
        projects: &[(
            "E-Commerce Platform",
            "Storefront with payments, inventory management and an analytics dashboard.",
            &["React", "Node.js", "PostgreSQL", "Stripe", "AWS"],
        )],
        education: &[(
            "Universitas Indonesia",
            "Sarjana",
            "Teknik Informatika",
            "2016-08-01",
            "2020-06-30",
            "3.7",
        )],
    },
    DemoPortfolio {
        name: "Sari Dewi Lestari",
        title: "UI/UX Designer",
        email: "sari.dewi@email.com",
        phone: "+62 813-4567-8901",
        location: "Bandung, Indonesia",
        bio: "UI/UX designer focused on design systems, user research and accessible interfaces.",
        profile_image: "https://images.unsplash.com/photo-1581065178026-390bc4e78dad?w=400",
        links: &[("linkedin", "https://linkedin.com/in/saridewilestari")],
        skills: &["Figma", "Adobe XD", "Sketch", "Prototyping", "User Research", "UI/UX Design"],
        experiences: &[("Design Studio Creative", "Senior UI/UX Designer", "2021-03-01", None)],
        projects: &[(
            "Banking Mobile App Redesign",
            "Mobile banking redesign centred on usability and accessibility.",
            &["Figma", "Principle", "User Research", "Prototyping"],
        )],
        education: &[(
            "Institut Teknologi Bandung",
            "Sarjana",
            "Desain Komunikasi Visual",
            "2015-08-01",
            "2019-06-30",
            "3.8",
        )],
    },
    DemoPortfolio {
        name: "Budi Santoso",
        title: "Data Scientist",
        email: "budi.santoso@email.com",
        phone: "+62 814-5678-9012",
        location: "Surabaya, Indonesia",
        bio: "Data scientist working on machine learning models for supply chain and churn prediction.",
        profile_image: "https://images.unsplash.com/photo-1622169804256-0eb6873ff441?w=400",
        links: &[("github", "https://github.com/budisantoso")],
        skills: &["Python", "Machine Learning", "TensorFlow", "Pandas", "MySQL", "Data Analysis"],
        experiences: &[("Tech Analytics Corp", "Senior Data Scientist", "2020-09-01", None)],
        projects: &[(
            "Customer Churn Prediction Model",
            "Ensemble model predicting customer churn.",
            &["Python", "Scikit-learn", "Pandas", "TensorFlow"],
        )],
        education: &[
            (
                "Institut Teknologi Sepuluh Nopember",
                "Magister",
                "Statistika",
                "2016-08-01",
                "2018-06-30",
                "3.9",
            ),
            (
                "Universitas Airlangga",
                "Sarjana",
                "Matematika",
                "2012-08-01",
                "2016-06-30",
                "3.6",
            ),
        ],
    },
];

/// Seed the skill catalog and demo portfolios into empty tables.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if skills::Entity::find().count(db).await? == 0 {
        for (name, category, is_popular) in SKILL_CATALOG {
            skill_db::insert_skill(
                db,
                CreateSkill {
                    name: name.to_string(),
                    category: Some(category.to_string()),
                    is_popular: *is_popular,
                },
            )
            .await?;
        }
        tracing::info!(count = SKILL_CATALOG.len(), "seeded skill catalog");
    }

    if portfolio::Entity::find().count(db).await? > 0 {
        tracing::info!("portfolios present, skipping demo portfolios");
        return Ok(());
    }

    for demo in DEMO_PORTFOLIOS {
        seed_portfolio(db, demo).await?;
    }
    tracing::info!(count = DEMO_PORTFOLIOS.len(), "seeded demo portfolios");

    Ok(())
}

async fn seed_portfolio(db: &DatabaseConnection, demo: &DemoPortfolio) -> Result<(), DbErr> {
    let links: BTreeMap<String, String> = demo
        .links
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let created = portfolio_db::insert_portfolio(
        db,
        CreatePortfolio {
            name: demo.name.to_string(),
            title: demo.title.to_string(),
            email: demo.email.to_string(),
            phone: demo.phone.to_string(),
            location: demo.location.to_string(),
            bio: demo.bio.to_string(),
            profile_image: Some(demo.profile_image.to_string()),
            social_links: Some(SocialLinks(links)),
        },
    )
    .await?;

    for (index, skill_name) in demo.skills.iter().enumerate() {
        if let Some(skill) = skill_db::find_skill_by_name(db, skill_name).await? {
            let proficiency = 5 - (index as i32 % 3);
            portfolio_db::attach_skill(db, created.id, skill.id, proficiency).await?;
        }
    }

    for (company, position, start, end) in demo.experiences {
        experience_db::insert_experience(
            db,
            CreateExperience {
                portfolio_id: created.id,
                company: company.to_string(),
                position: position.to_string(),
                start_date: date(start)?,
                end_date: end.map(date).transpose()?,
                description: String::new(),
                is_current_role: end.is_none(),
                sort_order: 0,
            },
        )
        .await?;
    }

    for (title, description, technologies) in demo.projects {
        project_db::insert_project(
            db,
            CreateProject {
                portfolio_id: created.id,
                title: title.to_string(),
                description: description.to_string(),
                image: None,
                technologies: Technologies(technologies.iter().map(|t| t.to_string()).collect()),
                live_url: None,
                github_url: None,
                featured: true,
                sort_order: 0,
            },
        )
        .await?;
    }

    for (institution, degree, field, start, end, gpa) in demo.education {
        education_db::insert_education(
            db,
            CreateEducation {
                portfolio_id: created.id,
                institution: institution.to_string(),
                degree: degree.to_string(),
                field: field.to_string(),
                start_date: date(start)?,
                end_date: date(end)?,
                gpa: Some(gpa.to_string()),
                sort_order: 0,
            },
        )
        .await?;
    }

    Ok(())
}

fn date(text: &str) -> Result<NaiveDate, DbErr> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| DbErr::Custom(format!("bad seed date {text}: {e}")))
}
