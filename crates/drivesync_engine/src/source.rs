//! Delta source abstraction for sync operations.

use crate::error::{FetchError, FetchResult};
use drivesync_protocol::DeltaPage;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// The remote side of a sync: answers delta queries and accepts creations.
///
/// This trait abstracts the network layer so the driver can be exercised
/// against scripted pages as well as the real HTTP API.
pub trait DeltaSource: Send + Sync {
    /// Resolves the ID of the folder whose direct children are tracked.
    fn app_folder_id(&self) -> FetchResult<String>;

    /// Fetches the next delta page, resuming from `token` when present.
    fn fetch_delta(&self, token: Option<&str>) -> FetchResult<DeltaPage>;

    /// Creates a small text file named `name` in the tracked folder.
    fn create_file(&self, name: &str, folder_id: &str) -> FetchResult<()>;

    /// Creates a folder named `name` in the tracked folder.
    fn create_folder(&self, name: &str, folder_id: &str) -> FetchResult<()>;
}

/// Something created through a [`MockDeltaSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// A file with the given name.
    File(String),
    /// A folder with the given name.
    Folder(String),
}

/// A scripted delta source for testing.
///
/// Pages are served in the order they were pushed. Fetching from an empty
/// script fails with [`FetchError::Transport`].
#[derive(Debug)]
pub struct MockDeltaSource {
    folder_id: Mutex<FetchResult<String>>,
    pages: Mutex<VecDeque<FetchResult<DeltaPage>>>,
    requested_tokens: Mutex<Vec<Option<String>>>,
    create_result: Mutex<FetchResult<()>>,
    created: Mutex<Vec<Created>>,
}

impl MockDeltaSource {
    /// Creates a mock source tracking the folder `folder_id`.
    pub fn new(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Mutex::new(Ok(folder_id.into())),
            pages: Mutex::new(VecDeque::new()),
            requested_tokens: Mutex::new(Vec::new()),
            create_result: Mutex::new(Ok(())),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Queues a page for the next fetch.
    pub fn push_page(&self, page: DeltaPage) {
        self.pages.lock().push_back(Ok(page));
    }

    /// Queues a failure for the next fetch.
    pub fn push_error(&self, error: FetchError) {
        self.pages.lock().push_back(Err(error));
    }

    /// Makes the app-folder lookup fail with `error`.
    pub fn fail_folder_lookup(&self, error: FetchError) {
        *self.folder_id.lock() = Err(error);
    }

    /// Sets the outcome of subsequent create calls.
    pub fn set_create_result(&self, result: FetchResult<()>) {
        *self.create_result.lock() = result;
    }

    /// Tokens presented to [`DeltaSource::fetch_delta`], in call order.
    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requested_tokens.lock().clone()
    }

    /// Items successfully created, in call order.
    pub fn created(&self) -> Vec<Created> {
        self.created.lock().clone()
    }

    /// Number of scripted fetch results not yet consumed.
    pub fn pending_pages(&self) -> usize {
        self.pages.lock().len()
    }

    fn record_create(&self, item: Created) -> FetchResult<()> {
        let result = self.create_result.lock().clone();
        if result.is_ok() {
            self.created.lock().push(item);
        }
        result
    }
}

impl DeltaSource for MockDeltaSource {
    fn app_folder_id(&self) -> FetchResult<String> {
        self.folder_id.lock().clone()
    }

    fn fetch_delta(&self, token: Option<&str>) -> FetchResult<DeltaPage> {
        self.requested_tokens.lock().push(token.map(str::to_string));
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted delta page".into())))
    }

    fn create_file(&self, name: &str, _folder_id: &str) -> FetchResult<()> {
        self.record_create(Created::File(name.to_string()))
    }

    fn create_folder(&self, name: &str, _folder_id: &str) -> FetchResult<()> {
        self.record_create(Created::Folder(name.to_string()))
    }
}

impl<S: DeltaSource + ?Sized> DeltaSource for std::sync::Arc<S> {
    fn app_folder_id(&self) -> FetchResult<String> {
        (**self).app_folder_id()
    }

    fn fetch_delta(&self, token: Option<&str>) -> FetchResult<DeltaPage> {
        (**self).fetch_delta(token)
    }

    fn create_file(&self, name: &str, folder_id: &str) -> FetchResult<()> {
        (**self).create_file(name, folder_id)
    }

    fn create_folder(&self, name: &str, folder_id: &str) -> FetchResult<()> {
        (**self).create_folder(name, folder_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivesync_protocol::DeltaItem;

    #[test]
    fn serves_pages_in_order() {
        let source = MockDeltaSource::new("F");
        source.push_page(DeltaPage::new("T1", vec![]));
        source.push_error(FetchError::ResourceNotFound);

        assert_eq!(source.pending_pages(), 2);
        assert_eq!(source.fetch_delta(None).unwrap().next_token, "T1");
        assert_eq!(
            source.fetch_delta(Some("T1")),
            Err(FetchError::ResourceNotFound)
        );
        assert!(matches!(
            source.fetch_delta(Some("T1")),
            Err(FetchError::Transport(_))
        ));
        assert_eq!(
            source.requested_tokens(),
            vec![None, Some("T1".to_string()), Some("T1".to_string())]
        );
    }

    #[test]
    fn folder_lookup() {
        let source = MockDeltaSource::new("F");
        assert_eq!(source.app_folder_id().unwrap(), "F");

        source.fail_folder_lookup(FetchError::ResourceNotFound);
        assert_eq!(source.app_folder_id(), Err(FetchError::ResourceNotFound));
    }

    #[test]
    fn records_successful_creates_only() {
        let source = MockDeltaSource::new("F");
        source.create_file("a.txt", "F").unwrap();

        source.set_create_result(Err(FetchError::UnspecifiedStatus { status: 409 }));
        assert!(source.create_folder("G", "F").is_err());

        assert_eq!(source.created(), vec![Created::File("a.txt".into())]);
    }

    #[test]
    fn shared_source_delegates() {
        let source = std::sync::Arc::new(MockDeltaSource::new("F"));
        source.push_page(DeltaPage::new(
            "T1",
            vec![DeltaItem::file("A", "a.txt", "F", "2016-03-01 10:00:00")],
        ));

        let shared = std::sync::Arc::clone(&source);
        assert_eq!(shared.fetch_delta(None).unwrap().items.len(), 1);
        assert_eq!(source.pending_pages(), 0);
    }
}
