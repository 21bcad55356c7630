//! Paginated event listings and single-event pages

use crate::context::PageContext;
use crate::services::{EventQuery, EventsClient};
use crate::Result;
use chrono::NaiveDate;

/// Theme template for listings
pub const LISTING_TEMPLATE: &str = "events";
/// Theme template for a single event
pub const EVENT_TEMPLATE: &str = "event_page";

/// Page position within a listing; never stored, always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    /// `None` for page 0 or a page whose offset does not fit in a `u64`
    pub fn new(page: u64, page_size: u64) -> Option<Self> {
        let page_index = page.checked_sub(1)?;
        page_index.checked_mul(page_size)?;
        Some(Self { page, page_size })
    }

    /// Page from an optional path parameter; absent means the first page
    pub fn from_param(param: Option<&str>, page_size: u64) -> Option<Self> {
        match param {
            None => Self::new(1, page_size),
            Some(raw) => raw.parse().ok().and_then(|page| Self::new(page, page_size)),
        }
    }

    /// Page that starts at `offset`
    pub fn from_offset(offset: u64, page_size: u64) -> Self {
        Self {
            page: (offset / page_size.max(1)).saturating_add(1),
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        self.prev_page().saturating_mul(self.page_size)
    }

    /// Not clamped; templates decide whether to show the link
    pub fn next_page(&self) -> u64 {
        self.page.saturating_add(1)
    }

    /// `0` on the first page; templates decide whether to show the link
    pub fn prev_page(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    pub fn apply(&self, context: &mut PageContext) {
        context.insert("page", self.page);
        context.insert("next_page", self.next_page());
        context.insert("prev_page", self.prev_page());
    }
}

/// The two public listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView {
    /// Events starting today or later, soonest first
    Upcoming,
    /// Past events, most recent first
    Archive,
}

impl ListingView {
    pub fn order_by(&self) -> &'static str {
        match self {
            ListingView::Upcoming => "when_start",
            ListingView::Archive => "-when_start",
        }
    }

    pub fn filter(&self, today: NaiveDate) -> String {
        let today = today.format("%Y-%m-%d");
        match self {
            ListingView::Upcoming => format!("when_start >= '{today}'"),
            ListingView::Archive => format!("when_start < '{today}'"),
        }
    }
}

/// Builds listing and event contexts from the events service
pub struct ListingAssembler<'a> {
    events: &'a dyn EventsClient,
    page_size: u64,
    url_prefix: &'a str,
}

impl<'a> ListingAssembler<'a> {
    pub fn new(events: &'a dyn EventsClient, page_size: u64, url_prefix: &'a str) -> Self {
        Self {
            events,
            page_size,
            url_prefix,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Fetch one page and merge it with pagination into a fresh context
    pub async fn assemble_listing(
        &self,
        pagination: Pagination,
        order_by: &str,
        filter: &str,
    ) -> Result<PageContext> {
        let query = EventQuery {
            offset: pagination.offset(),
            count: self.page_size,
            order_by: order_by.to_string(),
            filter: filter.to_string(),
        };
        let page = self.events.list_events(&query).await?;

        let mut context = PageContext::base(self.url_prefix);
        context.merge(&page)?;
        Pagination::from_offset(page.offset, self.page_size).apply(&mut context);
        Ok(context)
    }

    pub async fn assemble_view(
        &self,
        view: ListingView,
        pagination: Pagination,
        today: NaiveDate,
    ) -> Result<PageContext> {
        let mut context = self
            .assemble_listing(pagination, view.order_by(), &view.filter(today))
            .await?;
        if view == ListingView::Archive {
            context.insert("archive", format!("{}/archive", self.url_prefix));
        }
        Ok(context)
    }

    pub async fn assemble_event(&self, id: u64) -> Result<PageContext> {
        let event = self.events.get_event(id).await?;
        let mut context = PageContext::base(self.url_prefix);
        context.merge(&event)?;
        Ok(context)
    }
}
