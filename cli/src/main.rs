use clap::{Parser, Subcommand};
use curricle::model::entity::{
    Course, CourseCreate, CourseVersion, CourseVersionCreate, ItemEntry, ItemType, ItemsGroup,
    ModuleEntry, Quiz, QuizCreate, SectionEntry,
};
use curricle::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use curricle::order::{self, Anchor};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for seeding the course catalog DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage course versions
    Version {
        #[command(subcommand)]
        action: VersionCommands,
    },

    /// Manage modules within a version
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage sections within a module
    Section {
        #[command(subcommand)]
        action: SectionCommands,
    },

    /// Manage items within a section
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },

    /// Manage quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum VersionCommands {
    Add {
        /// Course name to attach the version to
        #[arg(long)]
        course_name: String,
        #[arg(long)]
        version: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    /// Append a module at the end of the version's sequence
    Add {
        #[arg(long)]
        version_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SectionCommands {
    /// Append a section at the end of the module's sequence
    Add {
        #[arg(long)]
        version_id: Uuid,
        /// Module name to attach the section to
        #[arg(long)]
        module_name: String,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Append an item at the end of the section's sequence
    Add {
        #[arg(long)]
        section_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_item_type)]
        item_type: ItemType,
        /// Type-specific payload as a JSON string
        #[arg(long, default_value = "{}")]
        details: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Add {
        #[arg(long)]
        title: String,
        /// Fraction of the max score required to pass, in 0..=1
        #[arg(long, default_value_t = 0.5)]
        pass_threshold: f64,
        /// Allowed attempts per user, -1 for unlimited
        #[arg(long, default_value_t = -1)]
        max_attempts: i32,
    },
}

fn parse_item_type(s: &str) -> Result<ItemType, String> {
    match s.to_ascii_uppercase().as_str() {
        "VIDEO" => Ok(ItemType::Video),
        "BLOG" => Ok(ItemType::Blog),
        "QUIZ" => Ok(ItemType::Quiz),
        other => Err(format!("unknown item type: {other}")),
    }
}

#[tokio::main]
async fn main() -> curricle::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::Add { name, description } => {
                let course = Course::create(&mm, CourseCreate { name, description }).await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Version { action } => match action {
            VersionCommands::Add { course_name, version, description } => {
                let course_id: Uuid = sqlx::query_scalar("SELECT id FROM courses WHERE name = $1")
                    .bind(&course_name)
                    .fetch_one(mm.executor())
                    .await
                    .map_err(DatabaseError::SqlxError)?;

                let created =
                    CourseVersion::create(&mm, course_id, CourseVersionCreate { version, description })
                        .await?;
                println!("Version created: {:?}", created);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add { version_id, name, description } => {
                let version = CourseVersion::find_by_id(&mm, version_id)
                    .await?
                    .expect("no version with that id");

                let mut modules = version.modules_document();
                order::container::insert(&mut modules, ModuleEntry::new(name, description), Anchor::tail())
                    .expect("append never fails on a tail anchor");

                let saved =
                    CourseVersion::save_modules(&mm, version_id, &modules, version.row_version())
                        .await?;
                println!("Module added, version now has {} modules", saved.modules().len());
            }
        },

        Commands::Section { action } => match action {
            SectionCommands::Add { version_id, module_name, name } => {
                let version = CourseVersion::find_by_id(&mm, version_id)
                    .await?
                    .expect("no version with that id");

                let mut modules = version.modules_document();
                let module = modules
                    .iter_mut()
                    .find(|m| m.name == module_name)
                    .expect("no module with that name");

                let section_id = Uuid::new_v4();
                let group = ItemsGroup::create(&mm, version_id, section_id).await?;

                let mut section = SectionEntry::new(name, group.id());
                section.section_id = section_id;
                order::container::insert(&mut module.sections, section, Anchor::tail())
                    .expect("append never fails on a tail anchor");

                CourseVersion::save_modules(&mm, version_id, &modules, version.row_version()).await?;
                println!("Section created: {}", group.section_id());
            }
        },

        Commands::Item { action } => match action {
            ItemCommands::Add { section_id, name, description, item_type, details } => {
                let group = ItemsGroup::find_by_section(&mm, section_id)
                    .await?
                    .expect("no section with that id");

                let details: serde_json::Value =
                    serde_json::from_str(&details).expect("details must be valid JSON");

                let mut items = group.items_document();
                order::container::insert(
                    &mut items,
                    ItemEntry::new(name, description, item_type, details),
                    Anchor::tail(),
                )
                .expect("append never fails on a tail anchor");

                let saved = ItemsGroup::save_items(&mm, group.id(), &items, group.row_version()).await?;
                println!("Item added, section now has {} items", saved.items().len());
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Add { title, pass_threshold, max_attempts } => {
                let quiz = Quiz::create(&mm, QuizCreate { title, pass_threshold, max_attempts }).await?;
                println!("Quiz created: {:?}", quiz);
            }
        },
    }

    Ok(())
}
