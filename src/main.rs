use clap::{Parser, Subcommand};
use gallery_client::client::{GalleryClient, Landing};
use gallery_client::config::{self, ClientConfig};
use gallery_client::fetch_state::{Contents, PageView, StatusMessage};
use gallery_client::navigation::{Pager, page_numbers};
use gallery_client::types::Paginated;
use gallery_client::{output, search};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Page selection shared by every listing command.
#[derive(clap::Args, Clone, Copy)]
struct PageArgs {
    /// Page to fetch (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Records per page [default: pagination.per_page from the config]
    #[arg(long)]
    per_page: Option<u32>,
}

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Browse a collection/album/image gallery API from the terminal")]
#[command(long_about = "\
Browse a collection/album/image gallery API from the terminal

The API groups images into albums and albums into collections. Every
listing is paginated; relative image paths are resolved against the
storage URL, and anything without an image gets the placeholder.

Endpoints used:

  GET /collections?page&per_page            collections
  GET /collections/{id}                     collection
  GET /collections/{id}/albums?page&per_page  collection-albums
  GET /collections/{id}/albums/{album}      album
  GET /albums?page&per_page                 albums
  GET /albums/{id}/images?page&per_page     album-images
  GET /images?page&per_page                 images
  GET /featured-images                      featured

Cover image resolution (first available wins):
  Album:       cover_image_url → cover_image → first image → placeholder
  Collection:  cover_image_url → cover_image → first album's first image → placeholder

Run 'gallery gen-config' to generate a documented gallery.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file [default: ./gallery.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List collections, one page at a time
    Collections(PageArgs),
    /// Show a collection with its albums
    Collection { id: String },
    /// List the albums of a collection
    CollectionAlbums {
        id: String,
        #[command(flatten)]
        page: PageArgs,
        /// Fetch every album with its images instead of one page
        #[arg(long)]
        detailed: bool,
    },
    /// Show an album of a collection with its images
    Album { collection_id: String, album_id: String },
    /// List albums across all collections
    Albums(PageArgs),
    /// List the images of an album
    AlbumImages {
        id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List images across all albums
    Images(PageArgs),
    /// Show a single image
    Image { id: String },
    /// List active featured images in display order
    Featured,
    /// Fetch the first page of collections and albums plus featured images
    Landing {
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Search album names and image titles across every collection
    Search { query: String },
    /// Print the page bar for a page position (no network)
    Pages {
        current: u32,
        total: u32,
        /// Pages shown around the current one [default: pagination.window]
        #[arg(long)]
        window: Option<u32>,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "gallery_client=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::discover_config(cli.config.as_deref(), Path::new("."))?;
    let json = cli.json;
    let window = config.pagination.window;

    if let Command::Pages {
        current,
        total,
        window: explicit,
    } = cli.command
    {
        let items = page_numbers(current, total, explicit.unwrap_or(window));
        println!("{}", output::format_page_bar(&items, current.clamp(1, total.max(1))));
        return Ok(());
    }

    let client = GalleryClient::from_config(&config)?;
    let per_page = |args: PageArgs| args.per_page.unwrap_or(config.pagination.per_page);

    match cli.command {
        Command::Collections(args) => {
            let request = client.list_collections(args.page, per_page(args));
            show_page(json, window, request, output::print_collections_page).await?;
        }
        Command::Collection { id } => {
            show_view(json, client.get_collection(&id), output::print_collection_detail).await?;
        }
        Command::CollectionAlbums {
            id,
            detailed: true,
            ..
        } => {
            let albums = client.list_collection_albums_detailed(&id).await;
            show_view(json, async { Some(albums) }, |a: &Vec<_>| {
                output::print_albums_detailed(a)
            })
            .await?;
        }
        Command::CollectionAlbums { id, page, .. } => {
            let request = client.list_collection_albums(&id, page.page, per_page(page));
            show_page(json, window, request, output::print_albums_page).await?;
        }
        Command::Album {
            collection_id,
            album_id,
        } => {
            let request = client.get_collection_album(&collection_id, &album_id);
            show_view(json, request, output::print_album_detail).await?;
        }
        Command::Albums(args) => {
            let request = client.list_albums(args.page, per_page(args));
            show_page(json, window, request, output::print_albums_page).await?;
        }
        Command::AlbumImages { id, page } => {
            let request = client.list_album_images(&id, page.page, per_page(page));
            show_page(json, window, request, output::print_images_page).await?;
        }
        Command::Images(args) => {
            let request = client.list_images(args.page, per_page(args));
            show_page(json, window, request, output::print_images_page).await?;
        }
        Command::Image { id } => match client.get_image(&id).await {
            Some(image) => emit(json, &image, output::print_image_detail)?,
            None => output::print_status(StatusMessage::Failed),
        },
        Command::Featured => {
            let featured = client.get_featured_images().await;
            show_view(json, async { Some(featured) }, |f: &Vec<_>| {
                output::print_featured(f)
            })
            .await?;
        }
        Command::Landing { per_page } => {
            let landing = client
                .landing(per_page.unwrap_or(config.pagination.per_page))
                .await;
            if json {
                println!("{}", serde_json::to_string_pretty(&landing)?);
            } else {
                print_landing(&landing, window);
            }
        }
        Command::Search { query } => {
            run_search(json, &client, &config, &query).await?;
        }
        Command::Pages { .. } | Command::GenConfig => {}
    }

    Ok(())
}

/// Print `value` as JSON or through its text printer.
fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    print: impl FnOnce(&T),
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

/// Run one fetch through a `PageView` and print data or the status line.
async fn show_view<T, F>(
    json: bool,
    request: F,
    print: impl FnOnce(&T),
) -> Result<Option<T>, serde_json::Error>
where
    T: Contents + Serialize,
    F: Future<Output = Option<T>>,
{
    let mut view = PageView::new();
    view.load(request).await;
    let status = view.status();
    if let Some(data) = view.data() {
        emit(json, data, print)?;
    }
    match status {
        Some(StatusMessage::Empty) if json => {}
        Some(status) => output::print_status(status),
        None => {}
    }
    Ok(view.into_data())
}

/// [`show_view`] for a paginated listing, followed by its page bar.
async fn show_page<T, F>(
    json: bool,
    window: u32,
    request: F,
    print: fn(&Paginated<T>),
) -> Result<(), serde_json::Error>
where
    T: Serialize,
    F: Future<Output = Option<Paginated<T>>>,
{
    let page = show_view(json, request, print).await?;
    if let Some(page) = page.filter(|p| !json && !p.is_empty()) {
        let pager = Pager::from_meta(&page.meta, window);
        output::print_page_bar(&pager.items(), pager.current());
    }
    Ok(())
}

fn print_landing(landing: &Landing, window: u32) {
    println!("Featured");
    output::print_featured(&landing.featured);
    println!();
    match &landing.collections {
        Some(page) => {
            output::print_collections_page(page);
            let pager = Pager::from_meta(&page.meta, window);
            output::print_page_bar(&pager.items(), pager.current());
        }
        None => output::print_status(StatusMessage::Failed),
    }
    println!();
    match &landing.albums {
        Some(page) => output::print_albums_page(page),
        None => output::print_status(StatusMessage::Failed),
    }
}

async fn run_search(
    json: bool,
    client: &GalleryClient,
    config: &ClientConfig,
    query: &str,
) -> Result<(), serde_json::Error> {
    let collections = client.list_all_collections().await;
    let hits = search::search(&collections, query, &config.search);
    emit(json, hits.as_slice(), |hits| {
        output::print_search_hits(query, hits)
    })
}
