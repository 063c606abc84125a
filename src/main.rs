use std::path::PathBuf;

use clap::{Parser, Subcommand};
use interleges::{
    catalog::Catalog,
    config::Config,
    contact::{ContactForm, OutboxTransport},
    pages::PageContext,
    query::{ArticleQuery, CategoryFilter, SortOrder},
    template::Templates,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        global = true,
        default_value = "interleges.yml",
        help = "The site configuration file."
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole site.
    Build {
        #[arg(short, long, default_value = "public", help = "The destination directory")]
        dest: PathBuf,
    },
    /// Search the catalog.
    Search {
        #[arg(default_value = "", help = "Text to look for; empty lists everything.")]
        term: String,
        #[arg(long, help = "Category filter key, e.g. `civile`.")]
        category: Option<String>,
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
        #[arg(long, help = "Print the rendered results page instead of a list.")]
        html: bool,
    },
    /// Queue a contact-form message for the email service.
    Contact {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

fn search(
    config: &Config,
    term: String,
    category: Option<String>,
    sort: SortOrder,
    html: bool,
) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.articles, config.categories())?;
    let query = ArticleQuery {
        term,
        category: CategoryFilter::from(category),
        sort,
    };

    if html {
        let templates = Templates::new(config.templates_dir.as_deref())?;
        let page = PageContext::new(config, &catalog, &templates).article_list(&query)?;
        println!("{}", page.html);
        return Ok(());
    }

    let found = query.run(&catalog);
    for article in &found {
        println!(
            "{:>4}  {:<20}  {:<24}  {}",
            article.id, article.date, article.category, article.title
        );
    }
    log::info!("{} articoli trovati", found.len());

    Ok(())
}

fn run(args: Args) -> anyhow::Result<bool> {
    let config = Config::load(&args.config)?;

    match args.command {
        Command::Build { dest } => {
            log::info!("Beginning to build `{}`", config.site_url);
            log::info!("Outputting to {:?}", dest);

            let report = interleges::site::build_site(&config, &dest)?;

            log::info!(
                "Wrote {} pages, copied {} assets ({} up to date).",
                report.pages,
                report.assets_copied,
                report.assets_skipped
            );
        }
        Command::Search {
            term,
            category,
            sort,
            html,
        } => search(&config, term, category, sort, html)?,
        Command::Contact {
            first_name,
            last_name,
            email,
            subject,
            message,
        } => {
            let form = ContactForm {
                first_name,
                last_name,
                email,
                subject,
                message,
            };
            let mut outbox = OutboxTransport::new(&config.outbox_dir());
            let notice = form.submit(&mut outbox, chrono::Local::now(), &config.url("/contatti/"));

            if notice.is_error() {
                log::error!("{}", notice);
                return Ok(false);
            }
            log::info!("{}", notice);
        }
    }

    Ok(true)
}

fn main() {
    // Initialize Logging.
    let log_environ = env_logger::Env::new()
        .filter("INTERLEGES_LOG")
        .write_style("INTERLEGES_LOG_STYLE");
    let mut log_builder = env_logger::Builder::new();

    log_builder.filter_level(log::LevelFilter::Info);
    log_builder.parse_env(log_environ);
    log_builder.init();

    // Parse Arguments.
    let args = Args::parse();

    match run(args) {
        Ok(true) => log::info!("Done."),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            log::error!("{:#}", err);
            std::process::exit(1);
        }
    }
}
