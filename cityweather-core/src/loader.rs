//! Incremental city loader.
//!
//! Accumulates pages of the catalog into one growing list and exposes a
//! filtered, sorted view over it. At most one page request is in flight at a
//! time: [`CityLoader::begin_page`] hands out a [`PageTicket`] and refuses to
//! hand out another until [`CityLoader::complete_page`] has consumed it.

use crate::{
    catalog::{CityCatalog, PageRequest},
    error::CatalogError,
    model::{CityRecord, SortDirection, SortKey},
};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const CITY_ERROR_MESSAGE: &str = "Failed to fetch city data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// The catalog returned an empty page. No further requests are issued.
    Exhausted,
    /// The last request failed. `load_next_page` may retry it.
    Errored,
}

/// Proof that a page request was issued by this loader and is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    id: u64,
    page: usize,
    request: PageRequest,
}

impl PageTicket {
    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }
}

#[derive(Debug, Clone)]
pub struct CityLoader {
    page_size: usize,
    cities: Vec<CityRecord>,
    pages_loaded: usize,
    state: LoadState,
    error: Option<String>,
    search: String,
    sort: Option<(SortKey, SortDirection)>,
    next_ticket_id: u64,
    in_flight: Option<PageTicket>,
}

impl Default for CityLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CityLoader {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            cities: Vec::new(),
            pages_loaded: 0,
            state: LoadState::Idle,
            error: None,
            search: String::new(),
            sort: None,
            next_ticket_id: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<(SortKey, SortDirection)> {
        self.sort
    }

    /// Reserve the next page request.
    ///
    /// Returns `None` while a request is outstanding or once the catalog is
    /// exhausted. An errored loader may begin again; that is the retry path.
    pub fn begin_page(&mut self) -> Option<PageTicket> {
        match self.state {
            LoadState::Loading => {
                tracing::debug!("page request already in flight; ignoring trigger");
                return None;
            }
            LoadState::Exhausted => return None,
            LoadState::Idle | LoadState::Errored => {}
        }

        let ticket = PageTicket {
            id: self.next_ticket_id,
            page: self.pages_loaded,
            request: PageRequest {
                limit: self.page_size,
                offset: self.pages_loaded * self.page_size,
            },
        };
        self.next_ticket_id += 1;
        self.in_flight = Some(ticket);
        self.state = LoadState::Loading;
        self.error = None;

        Some(ticket)
    }

    /// The consumer reached the end of the rendered list.
    ///
    /// Unlike [`begin_page`](Self::begin_page) this never retries an error;
    /// only an explicit reload does.
    pub fn on_end_reached(&mut self) -> Option<PageTicket> {
        if self.error.is_some() {
            return None;
        }
        self.begin_page()
    }

    /// Apply the outcome of a page request.
    ///
    /// Returns `false` and changes nothing when `ticket` is not the request
    /// currently in flight (it was detached or superseded).
    pub fn complete_page(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<CityRecord>, CatalogError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(page = ticket.page, "discarding stale city page response");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(records) if records.is_empty() => {
                tracing::debug!(pages = self.pages_loaded, "city catalog exhausted");
                self.state = LoadState::Exhausted;
            }
            Ok(records) => {
                self.cities.extend(records);
                self.pages_loaded += 1;
                self.state = LoadState::Idle;
            }
            Err(err) => {
                tracing::warn!(page = ticket.page, error = %err, "city page request failed");
                self.error = Some(CITY_ERROR_MESSAGE.to_string());
                self.state = LoadState::Errored;
            }
        }

        true
    }

    /// Forget the outstanding request, if any. Its response will be discarded.
    pub fn detach(&mut self) {
        if self.in_flight.take().is_some() {
            self.state = LoadState::Idle;
        }
    }

    /// Load the first page if nothing has been loaded or requested yet.
    pub async fn mount(&mut self, catalog: &dyn CityCatalog) -> bool {
        if self.pages_loaded > 0 || self.state != LoadState::Idle {
            return false;
        }
        self.load_next_page(catalog).await
    }

    /// Fetch and apply the next page. Returns whether a request was issued.
    pub async fn load_next_page(&mut self, catalog: &dyn CityCatalog) -> bool {
        match self.begin_page() {
            Some(ticket) => self.fetch(ticket, catalog).await,
            None => false,
        }
    }

    /// [`on_end_reached`](Self::on_end_reached) followed by the fetch.
    pub async fn load_on_end_reached(&mut self, catalog: &dyn CityCatalog) -> bool {
        match self.on_end_reached() {
            Some(ticket) => self.fetch(ticket, catalog).await,
            None => false,
        }
    }

    async fn fetch(&mut self, ticket: PageTicket, catalog: &dyn CityCatalog) -> bool {
        let result = catalog.fetch_page(ticket.request).await;
        self.complete_page(ticket, result)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Select a sort column; reselecting the active column flips direction.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((active, direction)) if active == key => Some((key, direction.toggled())),
            _ => Some((key, SortDirection::Ascending)),
        };
    }

    /// Cities whose name contains the search text (ignoring case), sorted by the
    /// active column. Ties keep accumulation order.
    pub fn visible(&self) -> Vec<&CityRecord> {
        visible_cities(&self.cities, &self.search, self.sort)
    }
}

pub fn visible_cities<'a>(
    cities: &'a [CityRecord],
    search: &str,
    sort: Option<(SortKey, SortDirection)>,
) -> Vec<&'a CityRecord> {
    let needle = search.to_lowercase();
    let mut rows: Vec<&CityRecord> = cities
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .collect();

    if let Some((key, direction)) = sort {
        // sort_by is stable
        rows.sort_by(|a, b| {
            let ordering = a.field(key).cmp(b.field(key));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{collections::VecDeque, sync::Mutex};

    #[derive(Debug, Default)]
    struct ScriptedCatalog {
        responses: Mutex<VecDeque<Result<Vec<CityRecord>, CatalogError>>>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedCatalog {
        fn new(responses: Vec<Result<Vec<CityRecord>, CatalogError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CityCatalog for ScriptedCatalog {
        async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CityRecord>, CatalogError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn city(name: &str, country: &str, tz: &str) -> CityRecord {
        CityRecord::new(name, country, tz)
    }

    fn server_error() -> CatalogError {
        CatalogError::Status {
            status: 500,
            body: "boom".into(),
        }
    }

    fn names(rows: &[&CityRecord]) -> Vec<String> {
        rows.iter().map(|c| c.name.clone()).collect()
    }

    fn sample() -> Vec<CityRecord> {
        vec![
            city("Paris", "France", "Europe/Paris"),
            city("berlin", "Germany", "Europe/Berlin"),
            city("Lyon", "France", "Europe/Paris"),
            city("Parma", "Italy", "Europe/Rome"),
            city("Nice", "France", "Europe/Paris"),
        ]
    }

    fn loaded(cities: Vec<CityRecord>) -> CityLoader {
        let mut loader = CityLoader::new(10);
        let ticket = loader.begin_page().unwrap();
        assert!(loader.complete_page(ticket, Ok(cities)));
        loader
    }

    #[test]
    fn offsets_follow_pages_loaded() {
        let mut loader = CityLoader::new(10);

        let first = loader.begin_page().unwrap();
        assert_eq!(first.request(), PageRequest { limit: 10, offset: 0 });
        loader.complete_page(first, Ok(sample()));

        let second = loader.begin_page().unwrap();
        assert_eq!(second.page(), 1);
        assert_eq!(second.request(), PageRequest { limit: 10, offset: 10 });
    }

    #[test]
    fn second_trigger_is_refused_while_a_page_is_in_flight() {
        let mut loader = CityLoader::new(10);

        let ticket = loader.begin_page().unwrap();
        assert!(loader.begin_page().is_none());
        assert!(loader.on_end_reached().is_none());

        loader.complete_page(ticket, Ok(sample()));
        assert!(loader.on_end_reached().is_some());
    }

    #[test]
    fn empty_page_exhausts_the_loader() {
        let mut loader = loaded(sample());

        let ticket = loader.begin_page().unwrap();
        loader.complete_page(ticket, Ok(Vec::new()));

        assert_eq!(loader.state(), LoadState::Exhausted);
        assert!(!loader.has_more());
        assert!(loader.begin_page().is_none());
        assert!(loader.on_end_reached().is_none());
        assert_eq!(loader.pages_loaded(), 1);
    }

    #[test]
    fn error_keeps_cursor_and_accumulated_cities() {
        let mut loader = loaded(sample());

        let ticket = loader.begin_page().unwrap();
        loader.complete_page(ticket, Err(server_error()));

        assert_eq!(loader.state(), LoadState::Errored);
        assert_eq!(loader.error(), Some(CITY_ERROR_MESSAGE));
        assert_eq!(loader.cities().len(), 5);
        assert_eq!(loader.pages_loaded(), 1);

        loader.set_search("par");
        assert_eq!(names(&loader.visible()), vec!["Paris", "Parma"]);
    }

    #[test]
    fn end_reached_does_not_retry_but_explicit_reload_does() {
        let mut loader = loaded(sample());
        let ticket = loader.begin_page().unwrap();
        loader.complete_page(ticket, Err(server_error()));

        assert!(loader.on_end_reached().is_none());

        let retry = loader.begin_page().unwrap();
        assert_eq!(retry.request().offset, 10);
        assert_eq!(loader.error(), None);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut loader = CityLoader::new(10);

        let old = loader.begin_page().unwrap();
        loader.detach();
        assert_eq!(loader.state(), LoadState::Idle);

        let fresh = loader.begin_page().unwrap();
        assert_eq!(old.request(), fresh.request());

        assert!(!loader.complete_page(old, Ok(sample())));
        assert!(loader.cities().is_empty());
        assert!(loader.is_loading());

        assert!(loader.complete_page(fresh, Ok(sample())));
        assert_eq!(loader.cities().len(), 5);
    }

    #[test]
    fn duplicates_across_pages_are_kept() {
        let mut loader = loaded(vec![city("Paris", "France", "Europe/Paris")]);
        let ticket = loader.begin_page().unwrap();
        loader.complete_page(ticket, Ok(vec![city("Paris", "France", "Europe/Paris")]));

        assert_eq!(loader.cities().len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_on_name_only() {
        let mut loader = loaded(sample());

        loader.set_search("BER");
        assert_eq!(names(&loader.visible()), vec!["berlin"]);

        loader.set_search("france");
        assert!(loader.visible().is_empty());

        loader.set_search("");
        assert_eq!(loader.visible().len(), 5);
    }

    #[test]
    fn search_does_not_touch_accumulation() {
        let mut loader = loaded(sample());
        loader.set_search("zzz");

        assert_eq!(loader.cities().len(), 5);
        assert_eq!(loader.begin_page().unwrap().request().offset, 10);
    }

    #[test]
    fn unsorted_view_keeps_accumulation_order() {
        let loader = loaded(sample());
        assert_eq!(
            names(&loader.visible()),
            vec!["Paris", "berlin", "Lyon", "Parma", "Nice"]
        );
    }

    #[test]
    fn set_sort_toggles_on_same_key_and_resets_on_new_key() {
        let mut loader = CityLoader::default();

        loader.set_sort(SortKey::Name);
        assert_eq!(loader.sort(), Some((SortKey::Name, SortDirection::Ascending)));

        loader.set_sort(SortKey::Name);
        assert_eq!(loader.sort(), Some((SortKey::Name, SortDirection::Descending)));

        loader.set_sort(SortKey::Timezone);
        assert_eq!(loader.sort(), Some((SortKey::Timezone, SortDirection::Ascending)));
    }

    #[test]
    fn sort_by_country_is_stable() {
        let mut loader = loaded(sample());
        loader.set_sort(SortKey::CountryName);

        // France ties keep insertion order: Paris, Lyon, Nice.
        assert_eq!(
            names(&loader.visible()),
            vec!["Paris", "Lyon", "Nice", "berlin", "Parma"]
        );

        let once = names(&loader.visible());
        let twice = names(&loader.visible());
        assert_eq!(once, twice);
    }

    #[test]
    fn descending_keeps_ties_in_original_order() {
        let mut loader = loaded(sample());
        loader.set_sort(SortKey::CountryName);
        loader.set_sort(SortKey::CountryName);

        assert_eq!(
            names(&loader.visible()),
            vec!["Parma", "berlin", "Paris", "Lyon", "Nice"]
        );
    }

    #[test]
    fn toggling_twice_returns_to_ascending_order() {
        let mut loader = loaded(sample());
        loader.set_sort(SortKey::Timezone);
        let ascending = names(&loader.visible());

        loader.set_sort(SortKey::Timezone);
        loader.set_sort(SortKey::Timezone);

        assert_eq!(loader.sort(), Some((SortKey::Timezone, SortDirection::Ascending)));
        assert_eq!(names(&loader.visible()), ascending);
    }

    #[test]
    fn comparison_is_plain_lexicographic() {
        let mut loader = loaded(sample());
        loader.set_sort(SortKey::Name);

        // Uppercase sorts before lowercase.
        assert_eq!(
            names(&loader.visible()),
            vec!["Lyon", "Nice", "Paris", "Parma", "berlin"]
        );
    }

    #[test]
    fn filtered_view_is_subsequence_for_every_search() {
        let loader = loaded(sample());
        for search in ["", "a", "PAR", "i", "xyz", "n"] {
            let visible = visible_cities(loader.cities(), search, None);
            let expected: Vec<&CityRecord> = loader
                .cities()
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&search.to_lowercase()))
                .collect();
            assert_eq!(visible, expected, "search {search:?}");
        }
    }

    #[tokio::test]
    async fn mount_loads_first_page_once() {
        let catalog = ScriptedCatalog::new(vec![Ok(sample())]);
        let mut loader = CityLoader::new(5);

        assert!(loader.mount(&catalog).await);
        assert!(!loader.mount(&catalog).await);

        assert_eq!(catalog.requests(), vec![PageRequest { limit: 5, offset: 0 }]);
        assert_eq!(loader.cities().len(), 5);
    }

    #[tokio::test]
    async fn pages_are_requested_in_order_until_exhausted() {
        let catalog = ScriptedCatalog::new(vec![
            Ok(sample()),
            Ok(vec![city("Oslo", "Norway", "Europe/Oslo")]),
            Ok(Vec::new()),
        ]);
        let mut loader = CityLoader::new(5);

        while loader.load_on_end_reached(&catalog).await {}

        assert_eq!(
            catalog.requests(),
            vec![
                PageRequest { limit: 5, offset: 0 },
                PageRequest { limit: 5, offset: 5 },
                PageRequest { limit: 5, offset: 10 },
            ]
        );
        assert_eq!(loader.state(), LoadState::Exhausted);
        assert_eq!(loader.cities().len(), 6);
        assert!(!loader.load_next_page(&catalog).await);
        assert_eq!(catalog.requests().len(), 3);
    }

    #[tokio::test]
    async fn failed_page_is_retried_at_the_same_offset() {
        let catalog = ScriptedCatalog::new(vec![Ok(sample()), Err(server_error()), Ok(sample())]);
        let mut loader = CityLoader::new(5);

        loader.mount(&catalog).await;
        loader.load_on_end_reached(&catalog).await;
        assert_eq!(loader.state(), LoadState::Errored);

        assert!(!loader.load_on_end_reached(&catalog).await);
        assert!(loader.load_next_page(&catalog).await);

        let offsets: Vec<usize> = catalog.requests().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 5, 5]);
        assert_eq!(loader.cities().len(), 10);
        assert_eq!(loader.error(), None);
    }
}
