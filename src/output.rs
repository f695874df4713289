//! CLI output formatting for every command.
//!
//! # Entity Display Contract
//!
//! Every entity follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + name (+ optional count)
//! 2. **Context lines**: indented `Cover:`, `URL:`, description preview
//!
//! Positions in paginated listings are global, taken from the page's
//! `from` offset, so page 2 of a 15-per-page listing starts at `016`.
//!
//! # Output Format
//!
//! ## Listing
//!
//! ```text
//! Collections (page 2 of 3, 16-30 of 40)
//! 016 Heritage (2 albums)
//!     Cover: https://cdn.example.com/storage/satchels/brown.jpg
//!     Full-grain leather that ages with you.
//! 017 Weekend
//!     Cover: https://images.pexels.com/...
//!
//! 1 [2] 3
//! ```
//!
//! ## Detail
//!
//! ```text
//! Heritage (2 albums)
//!     Cover: https://cdn.example.com/storage/satchels/brown.jpg
//!     001 Satchels (2 images)
//!         Cover: https://cdn.example.com/storage/satchels/brown.jpg
//! ```
//!
//! ## Search
//!
//! ```text
//! album  Leather Satchels (Heritage)
//! image  Brown satchel in Leather Satchels (Heritage)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::fetch_state::StatusMessage;
use crate::navigation::PageItem;
use crate::search::SearchHit;
use crate::types::{Album, Collection, FeaturedImage, Image, Paginated, PaginationMeta};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: u64) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 album`, `2 albums`.
fn count_label(n: u64, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format an entity header: positional index + name, with optional count.
///
/// ```text
/// 001 Satchels (2 images)
/// 001 Weekend
/// ```
fn entity_header(index: u64, name: &str, count: Option<(u64, &str)>) -> String {
    match count {
        Some((n, noun)) => format!("{} {} ({})", format_index(index), name, count_label(n, noun)),
        None => format!("{} {}", format_index(index), name),
    }
}

/// Format an image line: titled images show title, untitled show the id.
///
/// ```text
/// 001 Brown
/// 002 (#702)
/// ```
fn image_line(index: u64, title: Option<&str>, id: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} (#{})", format_index(index), id),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn description_line(depth: usize, description: Option<&str>) -> Option<String> {
    let truncated = truncate_desc(description?.trim(), 60);
    (!truncated.is_empty()).then(|| format!("{}{}", indent(depth), truncated))
}

/// First position on a page: `from`, or 1 for an empty page.
fn first_position(meta: &PaginationMeta) -> u64 {
    meta.from.max(1)
}

/// `Collections (page 2 of 3, 16-30 of 40)`
fn page_heading(label: &str, meta: &PaginationMeta) -> String {
    format!(
        "{} (page {} of {}, {}-{} of {})",
        label, meta.current_page, meta.last_page, meta.from, meta.to, meta.total
    )
}

// ============================================================================
// Entities
// ============================================================================

fn collection_lines(index: u64, collection: &Collection, depth: usize) -> Vec<String> {
    let count = Some(collection.album_count())
        .filter(|n| *n > 0)
        .map(|n| (n, "album"));
    let mut lines = vec![format!(
        "{}{}",
        indent(depth),
        entity_header(index, &collection.name, count)
    )];
    lines.push(format!("{}Cover: {}", indent(depth + 1), collection.cover_image));
    lines.extend(description_line(depth + 1, collection.description.as_deref()));
    lines
}

fn album_lines(index: u64, album: &Album, depth: usize) -> Vec<String> {
    let mut header = entity_header(index, &album.name, Some((album.image_count(), "image")));
    if let Some(collection) = album.collection_name() {
        header.push_str(&format!(" [{collection}]"));
    }
    let mut lines = vec![format!("{}{}", indent(depth), header)];
    lines.push(format!("{}Cover: {}", indent(depth + 1), album.cover_image));
    lines.extend(description_line(depth + 1, album.description.as_deref()));
    lines
}

fn image_lines(index: u64, image: &Image, depth: usize) -> Vec<String> {
    vec![
        format!("{}{}", indent(depth), image_line(index, image.title.as_deref(), &image.id)),
        format!("{}URL: {}", indent(depth + 1), image.url),
    ]
}

// ============================================================================
// Listings
// ============================================================================

/// Format one page of any entity listing.
fn format_page<T>(
    label: &str,
    page: &Paginated<T>,
    lines_for: impl Fn(u64, &T, usize) -> Vec<String>,
) -> Vec<String> {
    let mut lines = vec![page_heading(label, &page.meta)];
    let first = first_position(&page.meta);
    for (i, item) in (first..).zip(&page.data) {
        lines.extend(lines_for(i, item, 0));
    }
    lines
}

pub fn format_collections_page(page: &Paginated<Collection>) -> Vec<String> {
    format_page("Collections", page, collection_lines)
}

pub fn format_albums_page(page: &Paginated<Album>) -> Vec<String> {
    format_page("Albums", page, album_lines)
}

pub fn format_images_page(page: &Paginated<Image>) -> Vec<String> {
    format_page("Images", page, image_lines)
}

/// Collection header followed by its albums, one level deeper.
pub fn format_collection_detail(collection: &Collection) -> Vec<String> {
    let mut lines = collection_lines(1, collection, 0);
    // detail view leads with the name, not a position
    lines[0] = match collection.album_count() {
        0 => collection.name.clone(),
        n => format!("{} ({})", collection.name, count_label(n, "album")),
    };
    for (i, album) in (1..).zip(&collection.albums) {
        lines.extend(album_lines(i, album, 1));
    }
    lines
}

/// Album header followed by its images, one level deeper.
pub fn format_album_detail(album: &Album) -> Vec<String> {
    let mut lines = album_lines(1, album, 0);
    lines[0] = match album.collection_name() {
        Some(collection) => format!(
            "{} ({}) [{}]",
            album.name,
            count_label(album.image_count(), "image"),
            collection
        ),
        None => format!("{} ({})", album.name, count_label(album.image_count(), "image")),
    };
    for (i, image) in (1..).zip(&album.images) {
        lines.extend(image_lines(i, image, 1));
    }
    lines
}

/// Several albums, each with its images.
pub fn format_albums_detailed(albums: &[Album]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, album) in (1..).zip(albums) {
        lines.extend(album_lines(i, album, 0));
        for (j, image) in (1..).zip(&album.images) {
            lines.extend(image_lines(j, image, 1));
        }
    }
    lines
}

pub fn format_image_detail(image: &Image) -> Vec<String> {
    let mut lines = image_lines(1, image, 0);
    lines[0] = image.title.clone().unwrap_or_else(|| format!("#{}", image.id));
    lines.push(format!("    Alt: {}", image.alt));
    if let Some(owner) = &image.owner {
        lines.push(format!("    Album: {}", owner.album_id));
    }
    lines
}

/// ```text
/// 1 Hero → https://cdn.example.com/storage/featured/hero.jpg
///     Autumn line
/// ```
pub fn format_featured(featured: &[FeaturedImage]) -> Vec<String> {
    let mut lines = Vec::new();
    for image in featured {
        let title = if image.title.is_empty() {
            format!("#{}", image.id)
        } else {
            image.title.clone()
        };
        lines.push(format!("{} {} → {}", image.position, title, image.url));
        lines.extend(description_line(1, image.description.as_deref()));
    }
    lines
}

pub fn format_search_hits(query: &str, hits: &[SearchHit<'_>]) -> Vec<String> {
    if hits.is_empty() {
        return vec![format!("No results found for \"{}\"", query.trim())];
    }
    hits.iter()
        .map(|hit| match hit {
            SearchHit::Album {
                album,
                collection_name,
            } => format!("album  {} ({})", album.name, collection_name),
            SearchHit::Image {
                album,
                collection_name,
                ..
            } => format!(
                "image  {} in {} ({})",
                hit.label(),
                album.name,
                collection_name
            ),
        })
        .collect()
}

// ============================================================================
// Navigation & status
// ============================================================================

/// Page bar with the current page in brackets: `1 … 7 [8] 9 … 20`.
pub fn format_page_bar(items: &[PageItem], current: u32) -> String {
    items
        .iter()
        .map(|item| match *item {
            PageItem::Page(n) if n == current => format!("[{n}]"),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_status(status: StatusMessage) -> String {
    if status.offers_retry() {
        format!("{status} (run the command again to retry)")
    } else {
        status.to_string()
    }
}

// ============================================================================
// Printers
// ============================================================================

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_collections_page(page: &Paginated<Collection>) {
    print_lines(format_collections_page(page));
}

pub fn print_albums_page(page: &Paginated<Album>) {
    print_lines(format_albums_page(page));
}

pub fn print_images_page(page: &Paginated<Image>) {
    print_lines(format_images_page(page));
}

pub fn print_collection_detail(collection: &Collection) {
    print_lines(format_collection_detail(collection));
}

pub fn print_album_detail(album: &Album) {
    print_lines(format_album_detail(album));
}

pub fn print_albums_detailed(albums: &[Album]) {
    print_lines(format_albums_detailed(albums));
}

pub fn print_image_detail(image: &Image) {
    print_lines(format_image_detail(image));
}

pub fn print_featured(featured: &[FeaturedImage]) {
    print_lines(format_featured(featured));
}

pub fn print_search_hits(query: &str, hits: &[SearchHit<'_>]) {
    print_lines(format_search_hits(query, hits));
}

pub fn print_page_bar(items: &[PageItem], current: u32) {
    println!();
    println!("{}", format_page_bar(items, current));
}

pub fn print_status(status: StatusMessage) {
    println!("{}", format_status(status));
}
