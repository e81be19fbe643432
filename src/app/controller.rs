use crate::app::state::{FormField, ViewState};
use crate::app::status::{StatusKind, StatusLine, StatusMessage};
use crate::app::view::{listing_entries, render_listing, ListingAction};
use crate::client::PropertyApi;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const MSG_LOAD_FAILED: &str = "Could not load properties";
pub const MSG_CREATED: &str = "Property created";
pub const MSG_UPDATED: &str = "Property updated";
pub const MSG_SAVE_FAILED: &str = "Error saving property";
pub const MSG_DELETED: &str = "Property deleted";
pub const MSG_DELETE_FAILED: &str = "Error deleting property";
pub const MSG_NOT_FOUND: &str = "Property not found";

/// Page controller: wires the forms and listing actions to the API.
///
/// Handlers take `&mut self`, so each one runs to completion before the
/// next starts and the last response always wins.
pub struct PropertyClient {
    api: Arc<dyn PropertyApi>,
    view: ViewState,
    status: StatusLine,
}

impl PropertyClient {
    pub fn new(api: Arc<dyn PropertyApi>, message_ttl: Duration) -> Self {
        Self {
            api,
            view: ViewState::default(),
            status: StatusLine::new(message_ttl),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status.current()
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.view.form.set(field, value);
    }

    /// Reset the main form to create mode
    pub fn clear_form(&mut self) {
        self.view.form.reset();
    }

    /// Initial page load
    pub async fn load(&mut self) {
        info!("Loading property list");
        self.refresh().await;
    }

    /// Fetch the collection and replace the rendered listing
    pub async fn refresh(&mut self) {
        let rendered = self.api.list().await.and_then(|properties| {
            let markup = render_listing(&properties)?;
            Ok((properties.len(), markup))
        });

        match rendered {
            Ok((count, markup)) => {
                self.view.listing = markup;
                info!("Rendered {} properties", count);
            }
            Err(err) => {
                warn!("Failed to load properties: {:#}", err);
                self.status.show(MSG_LOAD_FAILED, StatusKind::Error);
            }
        }
    }

    /// Submit the main form: update when an id is staged, create otherwise
    pub async fn submit(&mut self) {
        let draft = match self.view.form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                warn!("Rejected form: {:#}", err);
                self.status.show(MSG_SAVE_FAILED, StatusKind::Error);
                return;
            }
        };

        let (outcome, success) = match self.view.form.staged_id {
            Some(id) => {
                info!("Updating property {}", id);
                (self.api.update(id, &draft).await, MSG_UPDATED)
            }
            None => {
                info!("Creating property at {}", draft.address);
                (self.api.create(&draft).await, MSG_CREATED)
            }
        };

        match outcome {
            Ok(()) => {
                self.status.show(success, StatusKind::Info);
                self.view.form.reset();
                self.refresh().await;
            }
            Err(err) => {
                warn!("Failed to save property: {:#}", err);
                self.status.show(MSG_SAVE_FAILED, StatusKind::Error);
            }
        }
    }

    /// Run an action bound to a block of the rendered listing. Ids that are
    /// not in the current listing are refused without a request.
    pub async fn listing_action(&mut self, action: ListingAction) -> bool {
        let listed = listing_entries(&self.view.listing)
            .iter()
            .any(|entry| entry.actions.contains(&action));

        if !listed {
            warn!("{:?} is not bound to the current listing", action);
            self.status.show(
                format!("Property {} is not in the list", action.id()),
                StatusKind::Error,
            );
            return false;
        }

        match action {
            ListingAction::Edit(id) => self.edit_property(id).await,
            ListingAction::Delete(id) => self.delete_property(id).await,
        }
    }

    /// Listing "edit" action
    pub async fn edit_property(&mut self, id: i64) -> bool {
        match self.api.get(id).await {
            Ok(property) => {
                self.view.form.fill_from(&property);
                info!("Editing property {}", id);
                true
            }
            Err(err) => {
                warn!("Failed to fetch property {}: {:#}", id, err);
                self.status.show(MSG_NOT_FOUND, StatusKind::Error);
                false
            }
        }
    }

    /// Listing "delete" action
    pub async fn delete_property(&mut self, id: i64) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                info!("Deleted property {}", id);
                self.status.show(MSG_DELETED, StatusKind::Info);
                self.refresh().await;
                true
            }
            Err(err) => {
                warn!("Failed to delete property {}: {:#}", id, err);
                self.status.show(MSG_DELETE_FAILED, StatusKind::Error);
                false
            }
        }
    }

    /// Lookup form: load a typed id into the main form
    pub async fn lookup_edit(&mut self, raw_id: &str) {
        self.view.edit_lookup = raw_id.to_string();

        let Some(id) = parse_id(raw_id) else {
            warn!("Lookup id is not a number: {:?}", raw_id);
            self.status.show(MSG_NOT_FOUND, StatusKind::Error);
            return;
        };

        if self.edit_property(id).await {
            self.status
                .show(format!("Property {} loaded for editing", id), StatusKind::Info);
        }
    }

    /// Lookup form: delete a typed id
    pub async fn lookup_delete(&mut self, raw_id: &str) {
        self.view.delete_lookup = raw_id.to_string();

        let Some(id) = parse_id(raw_id) else {
            warn!("Delete id is not a number: {:?}", raw_id);
            self.status.show(MSG_DELETE_FAILED, StatusKind::Error);
            return;
        };

        match self.api.delete(id).await {
            Ok(()) => {
                info!("Deleted property {}", id);
                self.status
                    .show(format!("Property {} deleted", id), StatusKind::Info);
                self.refresh().await;
            }
            Err(err) => {
                warn!("Failed to delete property {}: {:#}", id, err);
                self.status.show(MSG_DELETE_FAILED, StatusKind::Error);
            }
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{ADD_LABEL, UPDATE_LABEL};
    use crate::models::{Property, PropertyDraft};
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Get(i64),
        Create(PropertyDraft),
        Update(i64, PropertyDraft),
        Delete(i64),
    }

    /// In-memory API that records every call
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        records: Mutex<BTreeMap<i64, Property>>,
        fail_writes: bool,
        fail_list: bool,
    }

    impl FakeApi {
        fn with(records: Vec<Property>) -> Self {
            let api = Self::default();
            {
                let mut map = api.records.lock().unwrap();
                for record in records {
                    map.insert(record.id, record);
                }
            }
            api
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl PropertyApi for FakeApi {
        async fn list(&self) -> Result<Vec<Property>> {
            self.record(Call::List);
            if self.fail_list {
                bail!("connection refused");
            }
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        async fn get(&self, id: i64) -> Result<Property> {
            self.record(Call::Get(id));
            match self.records.lock().unwrap().get(&id) {
                Some(record) => Ok(record.clone()),
                None => bail!("404 Not Found"),
            }
        }

        async fn create(&self, draft: &PropertyDraft) -> Result<()> {
            self.record(Call::Create(draft.clone()));
            if self.fail_writes {
                bail!("500 Internal Server Error");
            }
            let mut map = self.records.lock().unwrap();
            let id = map.keys().next_back().copied().unwrap_or(0) + 1;
            map.insert(id, draft.clone().into_property(id));
            Ok(())
        }

        async fn update(&self, id: i64, draft: &PropertyDraft) -> Result<()> {
            self.record(Call::Update(id, draft.clone()));
            let mut map = self.records.lock().unwrap();
            if self.fail_writes || !map.contains_key(&id) {
                bail!("404 Not Found");
            }
            map.insert(id, draft.clone().into_property(id));
            Ok(())
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.record(Call::Delete(id));
            if self.fail_writes {
                bail!("500 Internal Server Error");
            }
            self.records.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    fn property(id: i64, address: &str) -> Property {
        Property {
            id,
            address: address.to_string(),
            price: 100000.0,
            size: 50.0,
            description: Some(String::new()),
        }
    }

    fn client(api: &Arc<FakeApi>) -> PropertyClient {
        let api: Arc<dyn PropertyApi> = api.clone();
        PropertyClient::new(api, Duration::from_secs(3))
    }

    fn fill_oak_ave(client: &mut PropertyClient) {
        client.set_field(FormField::Address, "Oak Ave");
        client.set_field(FormField::Price, "200000");
        client.set_field(FormField::Size, "80");
        client.set_field(FormField::Description, "");
    }

    #[tokio::test]
    async fn load_renders_server_list() {
        let api = Arc::new(FakeApi::with(vec![property(1, "Main St")]));
        let mut client = client(&api);

        client.load().await;

        let entries = listing_entries(&client.view().listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lines[0], "Main St");
        assert_eq!(entries[0].lines[1], "ID: 1");
        assert_eq!(entries[0].lines[2], "Price: $100000");
        assert_eq!(entries[0].lines[3], "Size: 50 m²");
        assert_eq!(api.calls(), vec![Call::List]);
        assert!(client.status().is_none());
    }

    #[tokio::test]
    async fn failed_load_keeps_listing_and_reports() {
        let api = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        let mut client = client(&api);

        client.load().await;

        assert_eq!(client.view().listing, "");
        let status = client.status().unwrap();
        assert_eq!(status.text, MSG_LOAD_FAILED);
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[tokio::test]
    async fn submit_without_staged_id_posts_once_then_refreshes() {
        let api = Arc::new(FakeApi::default());
        let mut client = client(&api);
        fill_oak_ave(&mut client);

        client.submit().await;

        let expected = PropertyDraft {
            address: "Oak Ave".to_string(),
            price: 200000.0,
            size: 80.0,
            description: String::new(),
        };
        assert_eq!(api.calls(), vec![Call::Create(expected), Call::List]);
        assert_eq!(client.status().unwrap().text, MSG_CREATED);
        assert_eq!(client.view().form.address, "");
        assert_eq!(client.view().form.submit_label(), ADD_LABEL);
        assert_eq!(listing_entries(&client.view().listing).len(), 1);
    }

    #[tokio::test]
    async fn submit_with_staged_id_puts_and_never_posts() {
        let api = Arc::new(FakeApi::with(vec![property(3, "Main St")]));
        let mut client = client(&api);

        assert!(client.edit_property(3).await);
        assert_eq!(client.view().form.submit_label(), UPDATE_LABEL);
        client.set_field(FormField::Address, "Elm St");
        client.submit().await;

        let calls = api.calls();
        assert_eq!(calls[0], Call::Get(3));
        assert!(matches!(&calls[1], Call::Update(3, draft) if draft.address == "Elm St"));
        assert_eq!(calls[2], Call::List);
        assert!(!calls.iter().any(|call| matches!(call, Call::Create(_))));

        assert_eq!(client.status().unwrap().text, MSG_UPDATED);
        assert_eq!(client.view().form.staged_id, None);
        let entries = listing_entries(&client.view().listing);
        assert_eq!(entries[0].lines[0], "Elm St");
    }

    #[tokio::test]
    async fn failed_save_keeps_form_for_retry() {
        let api = Arc::new(FakeApi {
            fail_writes: true,
            ..FakeApi::default()
        });
        let mut client = client(&api);
        fill_oak_ave(&mut client);

        client.submit().await;

        assert_eq!(api.calls().len(), 1);
        let status = client.status().unwrap();
        assert_eq!(status.text, MSG_SAVE_FAILED);
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(client.view().form.address, "Oak Ave");
    }

    #[tokio::test]
    async fn non_numeric_price_sends_nothing() {
        let api = Arc::new(FakeApi::default());
        let mut client = client(&api);
        fill_oak_ave(&mut client);
        client.set_field(FormField::Price, "a lot");

        client.submit().await;

        assert!(api.calls().is_empty());
        assert_eq!(client.status().unwrap().text, MSG_SAVE_FAILED);
    }

    #[tokio::test]
    async fn edit_populates_every_field() {
        let mut record = property(2, "Pine Rd");
        record.price = 350000.0;
        record.size = 95.5;
        record.description = Some("Garden".to_string());
        let api = Arc::new(FakeApi::with(vec![record]));
        let mut client = client(&api);

        client.lookup_edit("2").await;

        let form = &client.view().form;
        assert_eq!(form.staged_id, Some(2));
        assert_eq!(form.address, "Pine Rd");
        assert_eq!(form.price, "350000");
        assert_eq!(form.size, "95.5");
        assert_eq!(form.description, "Garden");
        assert_eq!(
            client.status().unwrap().text,
            "Property 2 loaded for editing"
        );
    }

    #[tokio::test]
    async fn edit_of_missing_id_leaves_form_untouched() {
        let api = Arc::new(FakeApi::default());
        let mut client = client(&api);
        fill_oak_ave(&mut client);
        let before = client.view().form.clone();

        assert!(!client.edit_property(42).await);
        assert_eq!(client.view().form, before);
        assert_eq!(client.status().unwrap().text, MSG_NOT_FOUND);

        client.lookup_edit("not-a-number").await;
        assert_eq!(client.view().form, before);
        assert_eq!(client.status().unwrap().text, MSG_NOT_FOUND);
        assert_eq!(api.calls(), vec![Call::Get(42)]);
    }

    #[tokio::test]
    async fn list_delete_refreshes() {
        let api = Arc::new(FakeApi::with(vec![property(1, "Main St"), property(2, "Oak Ave")]));
        let mut client = client(&api);

        assert!(client.delete_property(1).await);

        assert_eq!(api.calls(), vec![Call::Delete(1), Call::List]);
        assert_eq!(client.status().unwrap().text, MSG_DELETED);
        let entries = listing_entries(&client.view().listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lines[0], "Oak Ave");
    }

    #[tokio::test]
    async fn listing_actions_only_reach_rendered_ids() {
        let api = Arc::new(FakeApi::with(vec![property(1, "Main St")]));
        let mut client = client(&api);
        client.load().await;

        assert!(!client.listing_action(ListingAction::Edit(99)).await);
        assert!(!client.listing_action(ListingAction::Delete(99)).await);
        assert_eq!(api.calls(), vec![Call::List]);
        let status = client.status().unwrap();
        assert_eq!(status.text, "Property 99 is not in the list");
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(client.view().form.staged_id, None);

        assert!(client.listing_action(ListingAction::Edit(1)).await);
        assert_eq!(client.view().form.staged_id, Some(1));
        assert!(client.listing_action(ListingAction::Delete(1)).await);
        assert_eq!(
            api.calls(),
            vec![Call::List, Call::Get(1), Call::Delete(1), Call::List]
        );

        // the refreshed listing no longer carries id 1
        assert!(!client.listing_action(ListingAction::Delete(1)).await);
        assert_eq!(api.calls().len(), 4);
    }

    #[tokio::test]
    async fn lookup_delete_names_the_id() {
        let api = Arc::new(FakeApi::with(vec![property(5, "Main St")]));
        let mut client = client(&api);

        client.lookup_delete("5").await;

        assert_eq!(api.calls(), vec![Call::Delete(5), Call::List]);
        let status = client.status().unwrap();
        assert!(status.text.contains('5'));
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(client.view().delete_lookup, "5");
    }

    #[tokio::test]
    async fn failed_delete_does_not_refresh() {
        let api = Arc::new(FakeApi {
            fail_writes: true,
            ..FakeApi::default()
        });
        let mut client = client(&api);

        client.lookup_delete("5").await;
        assert!(!client.delete_property(6).await);
        client.lookup_delete("five").await;

        assert_eq!(api.calls(), vec![Call::Delete(5), Call::Delete(6)]);
        assert_eq!(client.status().unwrap().text, MSG_DELETE_FAILED);
    }
}
