use crate::di::{Services, UseCases};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::Subcommand;
use ferrous_watchlist_application::pagination::{
    ListItemsPageLoader, LoadOutcome, PaginationController,
};
use ferrous_watchlist_domain::watchlist::WATCHED_AT_FORMAT;
use ferrous_watchlist_domain::{ListCategory, NewList, NewListItem, NewWatchEvent};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lists of an owner with item and watched counts
    Lists {
        #[arg(long)]
        owner: i64,
    },

    /// First watch date of each media id
    FirstDates {
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        ids: Vec<i64>,
    },

    /// Yearly and monthly goal progress
    Goals {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },

    /// Items of a list with watch status, loaded page by page
    Items {
        #[arg(long)]
        list: i64,
        /// Defaults to pagination.page_size from the configuration
        #[arg(long)]
        page_size: Option<usize>,
        /// Stop after this many pages
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Goal years each media id belongs to
    Reverse {
        #[arg(long)]
        owner: i64,
    },

    /// Create a list (custom, yearly_goal or monthly_goal)
    CreateList {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "custom")]
        category: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    DeleteList {
        #[arg(long)]
        list: i64,
    },

    AddItem {
        #[arg(long)]
        list: i64,
        #[arg(long)]
        media: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        poster: Option<String>,
    },

    RemoveItem {
        #[arg(long)]
        item: i64,
    },

    /// Record a watch event
    Watch {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        media: i64,
        /// "YYYY-MM-DD HH:MM:SS", defaults to now (UTC)
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        rating: Option<f64>,
    },

    /// Import a JSON array of watch events in one transaction
    Import { file: String },
}

pub async fn run(
    command: Command,
    services: &Services,
    use_cases: &UseCases,
    default_page_size: usize,
) -> anyhow::Result<()> {
    let aggregates = &services.aggregates;

    match command {
        Command::Lists { owner } => print(&aggregates.lists_with_summary(owner).await?),
        Command::FirstDates { ids } => print(&aggregates.first_occurrence_dates(&ids).await?),
        Command::Goals { owner, year, month } => {
            print(&aggregates.goals_data(owner, year, month).await?)
        }
        Command::Reverse { owner } => print(&aggregates.reverse_mapping(owner).await?),
        Command::Items {
            list,
            page_size,
            pages,
        } => {
            let page_size = page_size.unwrap_or(default_page_size);
            load_items(services, list, page_size, pages).await
        }
        Command::CreateList {
            owner,
            name,
            category,
            year,
            month,
        } => {
            let category: ListCategory = category.parse().map_err(anyhow::Error::msg)?;
            let list = match category {
                ListCategory::Custom => NewList::custom(owner, name),
                ListCategory::YearlyGoal => {
                    NewList::yearly_goal(owner, name, year.context("--year is required")?)
                }
                ListCategory::MonthlyGoal => NewList::monthly_goal(
                    owner,
                    name,
                    year.context("--year is required")?,
                    month.context("--month is required")?,
                ),
            };
            let list_id = use_cases.create_list.execute(list).await?;
            print(&json!({ "list_id": list_id }))
        }
        Command::DeleteList { list } => {
            use_cases.delete_list.execute(list).await?;
            print(&json!({ "deleted": list }))
        }
        Command::AddItem {
            list,
            media,
            title,
            poster,
        } => {
            let mut item = NewListItem::new(media, title);
            if let Some(poster) = poster {
                item = item.with_poster(poster);
            }
            let item_id = use_cases.add_list_item.execute(list, item).await?;
            print(&json!({ "item_id": item_id }))
        }
        Command::RemoveItem { item } => {
            use_cases.remove_list_item.execute(item).await?;
            print(&json!({ "removed": item }))
        }
        Command::Watch {
            owner,
            media,
            at,
            rating,
        } => {
            let watched_at = match at {
                Some(text) => NaiveDateTime::parse_from_str(&text, WATCHED_AT_FORMAT)
                    .with_context(|| format!("invalid --at value: {}", text))?,
                None => chrono::Utc::now().naive_utc(),
            };
            let mut event = NewWatchEvent::new(owner, media, watched_at);
            if let Some(rating) = rating {
                event = event.with_rating(rating);
            }
            let event_id = use_cases.record_watch.execute(event).await?;
            print(&json!({ "watch_event_id": event_id }))
        }
        Command::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file))?;
            let events: Vec<NewWatchEvent> = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a JSON array of watch events", file))?;
            let imported = use_cases.import_watch_history.execute(events).await?;
            print(&json!({ "imported": imported }))
        }
    }
}

async fn load_items(
    services: &Services,
    list_id: i64,
    page_size: usize,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    if page_size == 0 {
        bail!("--page-size must be greater than zero");
    }

    let pager = PaginationController::new(
        ListItemsPageLoader::new(Arc::clone(&services.aggregates), list_id),
        page_size,
    );
    let mut loaded_pages = 0;

    loop {
        if max_pages.is_some_and(|max| loaded_pages >= max) {
            break;
        }

        match pager.load_next().await? {
            LoadOutcome::Loaded(page) => {
                loaded_pages += 1;
                info!(
                    offset = page.offset,
                    items = page.len(),
                    has_more = page.has_more,
                    "Page loaded"
                );
            }
            LoadOutcome::Exhausted => break,
            other => {
                warn!(outcome = ?other, "Unexpected pagination outcome");
                break;
            }
        }
    }

    print(&json!({
        "list_id": list_id,
        "pages": loaded_pages,
        "state": format!("{:?}", pager.state()),
        "items": pager.items(),
    }))
}

fn print<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
