use chrono::Utc;
use clap::{Parser, Subcommand};
use searchayah_core::sources::catalog::DEFAULT_BOOKS_URL;
use searchayah_core::sources::hadith_cdn::DEFAULT_HADITH_CDN_URL;
use searchayah_core::sources::quran_api::DEFAULT_QURAN_API_URL;
use searchayah_core::{
    BookCatalogSource, CorpusCache, CorpusClient, CorpusKey, CorpusSource, DebounceGate,
    HadithCdnSource, Highlighter, Language, LocalJsonSource, Marker, QuranComSource, ResultRow,
    SearchSession, SearchSettings, SearchView,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "searchayah", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Hadith edition CDN base URL
    #[arg(long, env = "SEARCHAYAH_HADITH_URL", default_value = DEFAULT_HADITH_CDN_URL)]
    hadith_url: String,

    /// quran.com API base URL
    #[arg(long, env = "SEARCHAYAH_QURAN_URL", default_value = DEFAULT_QURAN_API_URL)]
    quran_url: String,

    /// Book catalog API base URL
    #[arg(long, env = "SEARCHAYAH_BOOKS_URL", default_value = DEFAULT_BOOKS_URL)]
    books_url: String,

    /// Number of result pages to print for a one-shot query.
    #[arg(long, global = true, default_value = "1")]
    pages: usize,

    /// Read queries from stdin, one per line, through the debounce gate.
    #[arg(long, global = true, default_value_t = false)]
    interactive: bool,

    /// Mark matches with `<mark>` tags instead of terminal colors.
    #[arg(long, global = true, default_value_t = false)]
    plain: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search the Quran in Arabic and one translation, or jump to `surah:verse`.
    Quran {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value = "english")]
        language: Language,
    },
    /// Search one hadith collection in a translated edition.
    Hadith {
        #[arg(long)]
        query: Option<String>,
        /// Collection name, e.g. bukhari, muslim, abudawud.
        #[arg(long, default_value = "bukhari")]
        book: String,
        #[arg(long, default_value = "english")]
        language: Language,
    },
    /// Fuzzy search of the Arabic Quran text from a speech transcript.
    Voice {
        #[arg(long)]
        transcript: Option<String>,
    },
    /// Search a book catalog category by title, description, or keyword.
    Books {
        #[arg(long)]
        category: String,
        #[arg(long)]
        query: Option<String>,
    },
    /// Search a name list stored as JSON files on disk.
    Names {
        /// Folder that contains name lists recursively.
        #[arg(long)]
        dir: PathBuf,
        /// File stem of the list, e.g. sahaba-english.
        #[arg(long, default_value = "sahaba-english")]
        list: String,
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value = "english")]
        language: Language,
    },
}

/// How a language switch maps onto the corpus key.
enum CorpusScope {
    Fixed,
    Quran,
    Hadith { book: String },
}

impl CorpusScope {
    fn rekey(&self, language: Language) -> anyhow::Result<Option<CorpusKey>> {
        match self {
            CorpusScope::Fixed => Ok(None),
            CorpusScope::Quran => Ok(Some(CorpusKey::quran_in(language))),
            CorpusScope::Hadith { book } => CorpusKey::hadith(language, book)
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("no hadith edition is published in {language}")),
        }
    }
}

struct Output {
    pages: usize,
    interactive: bool,
    highlighter: Highlighter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "searchayah boot"
    );

    let marker = if cli.plain {
        Marker::default()
    } else {
        Marker::new("\x1b[1;33m", "\x1b[0m")
    };
    let output = Output {
        pages: cli.pages.max(1),
        interactive: cli.interactive,
        highlighter: Highlighter::new(marker),
    };

    match cli.command {
        Command::Quran { query, language } => {
            let source = QuranComSource::new(&cli.quran_url)?;
            let key = CorpusKey::quran_in(language);
            let session = open_session(source, key, language, SearchSettings::quran_text())?;
            run(session, query, CorpusScope::Quran, output).await
        }
        Command::Hadith {
            query,
            book,
            language,
        } => {
            let scope = CorpusScope::Hadith { book };
            let key = scope
                .rekey(language)?
                .ok_or_else(|| anyhow::anyhow!("hadith search needs a collection"))?;
            let source = HadithCdnSource::new(&cli.hadith_url)?;
            let session = open_session(source, key, language, SearchSettings::hadith_text())?;
            run(session, query, scope, output).await
        }
        Command::Voice { transcript } => {
            let source = QuranComSource::new(&cli.quran_url)?.with_languages(Vec::new());
            let session = open_session(
                source,
                CorpusKey::uthmani(),
                Language::Arabic,
                SearchSettings::quran_voice(),
            )?;
            run(session, transcript, CorpusScope::Fixed, output).await
        }
        Command::Books { category, query } => {
            let source = BookCatalogSource::new(&cli.books_url)?;
            let session = open_session(
                source,
                CorpusKey::category(&category),
                Language::English,
                SearchSettings::book_catalog(),
            )?;
            run(session, query, CorpusScope::Fixed, output).await
        }
        Command::Names {
            dir,
            list,
            query,
            language,
        } => {
            let source = LocalJsonSource::new(dir);
            let available = source.keys();
            if !available.iter().any(|key| key.as_str() == list) {
                warn!(list = %list, available = available.len(), "name list not found on disk");
            }
            let session = open_session(source, CorpusKey::new(list), language, SearchSettings::sahaba_names())?;
            run(session, query, CorpusScope::Fixed, output).await
        }
    }
}

fn open_session<S>(
    source: S,
    key: CorpusKey,
    language: Language,
    settings: SearchSettings,
) -> anyhow::Result<SearchSession<S>>
where
    S: CorpusSource + Send + Sync,
{
    let client = Arc::new(CorpusClient::with_memory_cache(source));
    Ok(SearchSession::new(client, key, language, settings)?)
}

async fn run<S, C>(
    session: SearchSession<S, C>,
    query: Option<String>,
    scope: CorpusScope,
    output: Output,
) -> anyhow::Result<()>
where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
{
    let session = session.with_highlighter(output.highlighter.clone());
    if output.interactive {
        return interactive(session, scope).await;
    }

    let query = query.ok_or_else(|| anyhow::anyhow!("a query is required unless --interactive is set"))?;
    one_shot(session, &query, output.pages).await
}

async fn one_shot<S, C>(
    mut session: SearchSession<S, C>,
    query: &str,
    pages: usize,
) -> anyhow::Result<()>
where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
{
    let view = session.commit(query).await;
    if let SearchView::Failed(reason) = &view {
        anyhow::bail!("{reason}");
    }
    print_view(&view, session.settings().min_query_chars);

    for _ in 1..pages {
        let view = session.load_more();
        let SearchView::Results(page) = &view else {
            break;
        };
        print_appended(page.rows.get(page.appended.clone()).unwrap_or_default());
        if !page.has_more {
            break;
        }
    }
    Ok(())
}

/// Line-oriented loop: plain lines are queries, `:`-prefixed lines are commands.
async fn interactive<S, C>(
    mut session: SearchSession<S, C>,
    scope: CorpusScope,
) -> anyhow::Result<()>
where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
{
    let quiet = session.settings().debounce();
    let min_chars = session.settings().min_query_chars;
    let (input, mut committed) = DebounceGate::spawn::<String>(quiet);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("commands: :more  :lang <language>  :corpus <key>  :clear  :quit");

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let command = line.trim().to_string();
                match command.split_once(' ').unwrap_or((command.as_str(), "")) {
                    (":quit", _) => break,
                    (":clear", _) => session.clear(),
                    (":more", _) => {
                        let view = session.load_more();
                        if let SearchView::Results(page) = &view {
                            print_appended(page.rows.get(page.appended.clone()).unwrap_or_default());
                        }
                    }
                    (":lang", name) => {
                        let rekeyed = name
                            .trim()
                            .parse::<Language>()
                            .map_err(anyhow::Error::msg)
                            .and_then(|language| Ok((language, scope.rekey(language)?)));
                        match rekeyed {
                            Ok((language, Some(key))) => {
                                print_view(&session.select(key, language).await, min_chars);
                            }
                            Ok((language, None)) => {
                                print_view(&session.set_language(language).await, min_chars);
                            }
                            Err(error) => eprintln!("{error}"),
                        }
                    }
                    (":corpus", key) if !key.trim().is_empty() => {
                        let view = session.select_corpus(CorpusKey::new(key.trim())).await;
                        print_view(&view, min_chars);
                    }
                    _ => {
                        input.push(line);
                    }
                }
            }
            raw = committed.next() => {
                let Some(raw) = raw else { break };
                let view = session.commit(&raw).await;
                print_view(&view, min_chars);
            }
            () = tokio::time::sleep(quiet * 2), if !stdin_open => break,
        }
    }

    Ok(())
}

fn print_view(view: &SearchView, min_chars: usize) {
    match view {
        SearchView::Idle => println!("(type at least {min_chars} characters to search)"),
        SearchView::Failed(reason) => eprintln!("{reason}"),
        SearchView::NoMatches { query } => println!("No results found for \"{query}\""),
        SearchView::Results(page) => {
            println!("{} Search Results", page.total);
            for row in &page.rows {
                print_row(row);
            }
            if page.has_more {
                println!("... {} more (load more)", page.total - page.rows.len());
            }
        }
    }
}

fn print_appended(rows: &[ResultRow]) {
    for row in rows {
        print_row(row);
    }
}

fn print_row(row: &ResultRow) {
    match &row.heading {
        Some(heading) => println!("[{}] {heading}", row.id),
        None => println!("[{}]", row.id),
    }
    println!("  {}", row.body.markup);
    if let Some(original) = &row.original {
        println!("  {}", original.markup);
    }
    if let Some(link) = &row.link {
        println!("  {link}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_switch_rekeys_quran_and_hadith_but_not_fixed_corpora() {
        let quran = CorpusScope::Quran.rekey(Language::Urdu).expect("quran key");
        assert_eq!(quran.as_ref().map(CorpusKey::as_str), Some("quran-urdu"));

        let hadith = CorpusScope::Hadith {
            book: "muslim".to_string(),
        };
        let key = hadith.rekey(Language::English).expect("hadith key");
        assert_eq!(key.as_ref().map(CorpusKey::as_str), Some("eng-muslim"));

        assert!(CorpusScope::Fixed.rekey(Language::Urdu).expect("fixed").is_none());
    }

    #[tokio::test]
    async fn one_shot_failure_is_returned_as_the_error() {
        let source = LocalJsonSource::new(std::env::temp_dir().join("searchayah-no-such-lists"));
        let session = open_session(
            source,
            CorpusKey::new("sahaba-english"),
            Language::English,
            SearchSettings::sahaba_names(),
        )
        .expect("valid preset");

        let error = one_shot(session, "abu", 1).await.expect_err("missing list fails");
        assert!(error.to_string().starts_with("Error fetching sahaba-english"));
    }
}
