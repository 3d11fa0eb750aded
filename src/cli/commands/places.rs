//! Places command implementation
//!
//! This module implements the `places` commands that browse the tourism
//! registry: area listings, keyword search and the detail view.

use crate::adapters::registry::RegistryClient;
use crate::cli::exit_code_for;
use crate::config::{load_config, TourmarkConfig};
use crate::core::listing::{sort_records, validate_page, PageInfo, SortKey};
use crate::domain::{PlacePage, PoiId, PointOfInterest};
use clap::{Args, Subcommand};

/// Number of images fetched for the detail view
const DETAIL_IMAGE_COUNT: u32 = 20;

/// Places subcommands
#[derive(Subcommand, Debug)]
pub enum PlacesCommand {
    /// List places by area and category
    List(ListArgs),

    /// Search places by keyword
    Search(SearchArgs),

    /// Show details, operating info and images of one place
    Show(ShowArgs),
}

/// Filters and paging shared by `list` and `search`
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Area code
    #[arg(long)]
    pub area: Option<String>,

    /// Category (content type) id
    #[arg(long)]
    pub category: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Page size (defaults to registry.default_page_size)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub page_size: Option<u32>,

    /// Sort key (latest, name); anything else keeps the registry order
    #[arg(long, default_value = "as-fetched")]
    pub sort: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `places list`
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: ListingArgs,
}

/// Arguments for `places search`
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword
    pub keyword: String,

    #[command(flatten)]
    pub filters: ListingArgs,
}

/// Arguments for `places show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Point of interest id
    pub id: String,

    /// Category id for operating info (defaults to the place's own)
    #[arg(long)]
    pub category: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl PlacesCommand {
    /// Execute the places command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let client = match RegistryClient::new(config.registry.clone()) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to create registry client");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match self {
            PlacesCommand::List(args) => list(&client, &config, None, &args.filters).await,
            PlacesCommand::Search(args) => {
                list(&client, &config, Some(&args.keyword), &args.filters).await
            }
            PlacesCommand::Show(args) => show(&client, args).await,
        }
    }
}

async fn list(
    client: &RegistryClient,
    config: &TourmarkConfig,
    keyword: Option<&str>,
    filters: &ListingArgs,
) -> anyhow::Result<i32> {
    let page_size = filters
        .page_size
        .unwrap_or(config.registry.default_page_size);
    let area = filters.area.as_deref();
    let category = filters.category.as_deref();

    tracing::info!(
        keyword = keyword.unwrap_or(""),
        area = area.unwrap_or(""),
        category = category.unwrap_or(""),
        page = filters.page,
        page_size = page_size,
        "Fetching places"
    );

    let result = match keyword {
        Some(keyword) => {
            client
                .search_by_keyword(keyword, area, category, page_size, filters.page)
                .await
        }
        None => {
            client
                .list_by_area_and_category(area, category, page_size, filters.page)
                .await
        }
    };

    let page = match result {
        Ok(p) => p,
        Err(e) => {
            crate::log_error_with_context!(&e, "Registry request failed");
            println!("❌ Registry request failed");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    let info = PageInfo::clamped(page.total_count, page_size, filters.page);
    if let Err(e) = validate_page(filters.page, info.total_pages) {
        println!("❌ {e}");
        return Ok(2);
    }

    let PlacePage { records, .. } = page;
    let records = sort_records(records, &SortKey::parse(&filters.sort));

    if filters.json {
        let output = serde_json::json!({ "page": info, "records": records });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    print_records(&records);
    println!();
    println!(
        "Page {} of {} ({} total)",
        info.page, info.total_pages, info.total_count
    );
    Ok(0)
}

async fn show(client: &RegistryClient, args: &ShowArgs) -> anyhow::Result<i32> {
    let id = match PoiId::new(args.id.as_str()) {
        Ok(id) => id,
        Err(e) => {
            println!("❌ {e}");
            return Ok(2);
        }
    };

    let place = match client.get_detail(&id).await {
        Ok(Some(place)) => place,
        Ok(None) => {
            println!("⚠️  No place found with id {id}");
            return Ok(1);
        }
        Err(e) => {
            println!("❌ Failed to load place {id}");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    let category = args
        .category
        .clone()
        .unwrap_or_else(|| place.category_id.clone());
    let operating = if category.trim().is_empty() {
        None
    } else {
        match client.get_operating_info(&id, &category).await {
            Ok(info) => info,
            Err(e) => {
                println!("❌ Failed to load operating info");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        }
    };

    let images = match client.get_images(&id, DETAIL_IMAGE_COUNT, 1).await {
        Ok(images) => images,
        Err(e) => {
            println!("❌ Failed to load images");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    if args.json {
        let output = serde_json::json!({
            "place": place,
            "operating_info": operating,
            "images": images,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    println!("📍 {} [{}]", place.title, place.id);
    if !place.address.primary.is_empty() {
        println!("  Address: {}", place.address.full());
    }
    if let Some(coords) = place.coordinates {
        println!("  Location: {:.7}, {:.7}", coords.lat, coords.lng);
    }
    if let Some(phone) = &place.phone {
        println!("  Phone: {phone}");
    }
    if let Some(info) = &operating {
        if let Some(hours) = info.opening_hours() {
            println!("  Hours: {hours}");
        }
        if let Some(rest) = info.rest_days() {
            println!("  Closed: {rest}");
        }
        if let Some(parking) = info.parking() {
            println!("  Parking: {parking}");
        }
        if let Some(desk) = info.info_center() {
            println!("  Info: {desk}");
        }
    }
    if let Some(overview) = &place.overview {
        println!();
        println!("{overview}");
    }
    if !images.is_empty() {
        println!();
        println!("🖼️  {} image(s):", images.len());
        for image in &images {
            println!("  - {}", image.origin_url);
        }
    }
    Ok(0)
}

fn print_records(records: &[PointOfInterest]) {
    if records.is_empty() {
        println!("No places found.");
        return;
    }

    println!("{:<12} {:<40} {:<16} Address", "ID", "Title", "Modified");
    println!("{}", "-".repeat(100));
    for record in records {
        println!(
            "{:<12} {:<40} {:<16} {}",
            record.id.as_str(),
            record.title,
            record.last_modified.as_deref().unwrap_or("-"),
            record.address.full()
        );
    }
}
