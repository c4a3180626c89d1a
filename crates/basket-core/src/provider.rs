//! # Discount Providers
//!
//! A tree of discount sources that can be traversed uniformly.
//!
//! ## Composite Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Provider Tree                                   │
//! │                                                                         │
//! │                      Group (root)                                       │
//! │                     /            \                                      │
//! │          Group (campaigns)     Group (coupons)                          │
//! │           /        \                 |                                  │
//! │     Item(A)      Item(B)          Item(C)                               │
//! │       │            │                 │                                  │
//! │   listeners    listeners         listeners  ◄── the cart(s)             │
//! │                                                                         │
//! │  provide_discount() walks depth-first in insertion order:  A, B, C     │
//! │  Priority is expressed by nesting and order, not by a number.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Listener Sharing
//! Listeners are shared as `Arc<Mutex<dyn DiscountListener + Send>>`, the same
//! way the checkout shares its cart. Registration is idempotent by pointer
//! identity. A group forwards registration to the children it has *now*;
//! providers added later need to be registered separately.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

use crate::discount::Discount;

// =============================================================================
// Listener & Event
// =============================================================================

/// Receives discounts emitted by providers.
pub trait DiscountListener {
    fn discount_provided(&mut self, event: &DiscountProvidedEvent);
}

/// A listener shared between the provider tree and its owner.
pub type SharedListener = Arc<Mutex<dyn DiscountListener + Send>>;

/// Carries one discount from an item to its listeners.
#[derive(Debug, Clone)]
pub struct DiscountProvidedEvent {
    discount: Arc<Discount>,
}

impl DiscountProvidedEvent {
    pub fn new(discount: Arc<Discount>) -> Self {
        DiscountProvidedEvent { discount }
    }

    pub fn discount(&self) -> &Arc<Discount> {
        &self.discount
    }
}

// =============================================================================
// Validity Window
// =============================================================================

/// The `[start, finish)` range during which an item may emit.
///
/// An open-ended window (`finish == None`) is always valid, including
/// before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidityWindow {
    start: DateTime<Utc>,
    finish: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    pub fn new(start: DateTime<Utc>, finish: Option<DateTime<Utc>>) -> Self {
        ValidityWindow { start, finish }
    }

    /// A window with no bounds.
    pub fn always() -> Self {
        ValidityWindow {
            start: DateTime::<Utc>::MIN_UTC,
            finish: None,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn finish(&self) -> Option<DateTime<Utc>> {
        self.finish
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        match self.finish {
            None => true,
            Some(finish) => self.start <= now && now < finish,
        }
    }
}

impl Default for ValidityWindow {
    fn default() -> Self {
        ValidityWindow::always()
    }
}

// =============================================================================
// Item Provider
// =============================================================================

/// Wraps a single discount.
#[derive(Clone)]
pub struct DiscountItem {
    discount: Arc<Discount>,
    window: ValidityWindow,
    listeners: Vec<SharedListener>,
}

impl DiscountItem {
    /// Creates an item that is always valid.
    pub fn new(discount: Discount) -> Self {
        DiscountItem::shared(Arc::new(discount))
    }

    /// Creates an item around an already shared discount.
    pub fn shared(discount: Arc<Discount>) -> Self {
        DiscountItem {
            discount,
            window: ValidityWindow::always(),
            listeners: Vec::new(),
        }
    }

    /// Restricts emission to `window`.
    pub fn with_window(mut self, window: ValidityWindow) -> Self {
        self.window = window;
        self
    }

    pub fn discount(&self) -> &Arc<Discount> {
        &self.discount
    }

    pub fn window(&self) -> &ValidityWindow {
        &self.window
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.window.contains(now)
    }

    pub fn provide_discount_at(&self, now: DateTime<Utc>) {
        if !self.is_valid_at(now) {
            debug!(
                discount = %self.discount.name(),
                "Discount outside validity window, not provided"
            );
            return;
        }

        let event = DiscountProvidedEvent::new(Arc::clone(&self.discount));
        self.notify_listeners(&event);
    }

    pub fn register_listener(&mut self, listener: SharedListener) {
        if self.listeners.iter().any(|known| Arc::ptr_eq(known, &listener)) {
            return;
        }
        self.listeners.push(listener);
    }

    pub fn unregister_listener(&mut self, listener: &SharedListener) {
        self.listeners.retain(|known| !Arc::ptr_eq(known, listener));
    }

    pub fn notify_listeners(&self, event: &DiscountProvidedEvent) {
        trace!(
            discount = %event.discount().name(),
            listeners = self.listeners.len(),
            "Notifying listeners"
        );
        for listener in &self.listeners {
            let mut guard = listener.lock().unwrap_or_else(PoisonError::into_inner);
            guard.discount_provided(event);
        }
    }
}

/// Structural equality: same discount, same window. Listeners are ignored.
impl PartialEq for DiscountItem {
    fn eq(&self, other: &Self) -> bool {
        self.discount == other.discount && self.window == other.window
    }
}

impl Eq for DiscountItem {}

impl fmt::Debug for DiscountItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountItem")
            .field("discount", &self.discount)
            .field("window", &self.window)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Group Provider
// =============================================================================

/// An ordered, duplicate-free collection of child providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountGroup {
    children: Vec<DiscountProvider>,
}

impl DiscountGroup {
    pub fn new() -> Self {
        DiscountGroup::default()
    }

    /// Appends `provider` unless a structurally equal child is present.
    ///
    /// ## Returns
    /// `true` if the provider was added.
    pub fn add_discount_provider(&mut self, provider: impl Into<DiscountProvider>) -> bool {
        let provider = provider.into();
        if self.children.contains(&provider) {
            debug!("Provider already present in group, ignored");
            return false;
        }
        self.children.push(provider);
        true
    }

    /// Removes the structurally equal child, if any.
    ///
    /// ## Returns
    /// `true` if a child was removed.
    pub fn remove_discount_provider(&mut self, provider: &DiscountProvider) -> bool {
        let before = self.children.len();
        self.children.retain(|child| child != provider);
        self.children.len() != before
    }

    pub fn children(&self) -> &[DiscountProvider] {
        &self.children
    }

    /// Children in insertion (traversal) order.
    pub fn iter(&self) -> std::slice::Iter<'_, DiscountProvider> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn provide_discount_at(&self, now: DateTime<Utc>) {
        for child in self.iter() {
            child.provide_discount_at(now);
        }
    }

    pub fn register_listener(&mut self, listener: SharedListener) {
        for child in &mut self.children {
            child.register_listener(Arc::clone(&listener));
        }
    }

    pub fn unregister_listener(&mut self, listener: &SharedListener) {
        for child in &mut self.children {
            child.unregister_listener(listener);
        }
    }

    pub fn notify_listeners(&self, event: &DiscountProvidedEvent) {
        for child in &self.children {
            child.notify_listeners(event);
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// A node in the provider tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountProvider {
    Item(DiscountItem),
    Group(DiscountGroup),
}

impl DiscountProvider {
    /// Emits every time-valid discount in the subtree, using the current time.
    pub fn provide_discount(&self) {
        self.provide_discount_at(Utc::now());
    }

    pub fn provide_discount_at(&self, now: DateTime<Utc>) {
        match self {
            DiscountProvider::Item(item) => item.provide_discount_at(now),
            DiscountProvider::Group(group) => group.provide_discount_at(now),
        }
    }

    pub fn register_listener(&mut self, listener: SharedListener) {
        match self {
            DiscountProvider::Item(item) => item.register_listener(listener),
            DiscountProvider::Group(group) => group.register_listener(listener),
        }
    }

    pub fn unregister_listener(&mut self, listener: &SharedListener) {
        match self {
            DiscountProvider::Item(item) => item.unregister_listener(listener),
            DiscountProvider::Group(group) => group.unregister_listener(listener),
        }
    }

    pub fn notify_listeners(&self, event: &DiscountProvidedEvent) {
        match self {
            DiscountProvider::Item(item) => item.notify_listeners(event),
            DiscountProvider::Group(group) => group.notify_listeners(event),
        }
    }
}

impl From<DiscountItem> for DiscountProvider {
    fn from(item: DiscountItem) -> Self {
        DiscountProvider::Item(item)
    }
}

impl From<DiscountGroup> for DiscountProvider {
    fn from(group: DiscountGroup) -> Self {
        DiscountProvider::Group(group)
    }
}

impl From<Discount> for DiscountProvider {
    fn from(discount: Discount) -> Self {
        DiscountProvider::Item(DiscountItem::new(discount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{Duration, TimeZone};

    /// Records the names it receives.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl DiscountListener for Recorder {
        fn discount_provided(&mut self, event: &DiscountProvidedEvent) {
            self.seen.push(event.discount().name().to_string());
        }
    }

    fn recorder() -> (Arc<Mutex<Recorder>>, SharedListener) {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let listener: SharedListener = recorder.clone();
        (recorder, listener)
    }

    fn seen(recorder: &Arc<Mutex<Recorder>>) -> Vec<String> {
        recorder.lock().unwrap().seen.clone()
    }

    fn item(name: &str) -> DiscountItem {
        DiscountItem::new(Discount::fixed(name, Money::from_units(1)).unwrap())
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let start = noon();
        let finish = start + Duration::days(1);
        let window = ValidityWindow::new(start, Some(finish));

        assert!(window.contains(start));
        assert!(window.contains(finish - Duration::seconds(1)));
        assert!(!window.contains(finish));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn test_open_ended_window_is_always_valid() {
        let window = ValidityWindow::new(noon(), None);
        assert!(window.contains(noon() - Duration::days(365)));
        assert!(window.contains(noon() + Duration::days(365)));
    }

    #[test]
    fn test_item_emits_only_when_valid() {
        let (recorder, listener) = recorder();
        let window = ValidityWindow::new(noon(), Some(noon() + Duration::hours(1)));
        let mut item = item("flash-sale").with_window(window);
        item.register_listener(listener);

        item.provide_discount_at(noon() - Duration::minutes(1));
        assert!(seen(&recorder).is_empty());

        item.provide_discount_at(noon());
        assert_eq!(seen(&recorder), vec!["flash-sale"]);
    }

    #[test]
    fn test_register_is_idempotent_and_unregister_removes() {
        let (recorder, listener) = recorder();
        let mut item = item("coupon");

        item.register_listener(Arc::clone(&listener));
        item.register_listener(Arc::clone(&listener));
        assert_eq!(item.listener_count(), 1);

        item.provide_discount_at(noon());
        assert_eq!(seen(&recorder).len(), 1);

        item.unregister_listener(&listener);
        assert_eq!(item.listener_count(), 0);
        item.provide_discount_at(noon());
        assert_eq!(seen(&recorder).len(), 1);
    }

    #[test]
    fn test_group_traverses_depth_first_in_insertion_order() {
        let (recorder, listener) = recorder();

        let mut campaigns = DiscountGroup::new();
        campaigns.add_discount_provider(item("a"));
        campaigns.add_discount_provider(item("b"));

        let mut coupons = DiscountGroup::new();
        coupons.add_discount_provider(item("c"));

        let mut root = DiscountGroup::new();
        root.add_discount_provider(campaigns);
        root.add_discount_provider(coupons);

        let mut root = DiscountProvider::from(root);
        root.register_listener(listener);
        root.provide_discount_at(noon());

        assert_eq!(seen(&recorder), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_group_dedups_structurally_equal_children() {
        let mut group = DiscountGroup::new();

        assert!(group.add_discount_provider(item("coupon")));
        assert!(!group.add_discount_provider(item("coupon")));
        assert_eq!(group.len(), 1);

        let mut nested = DiscountGroup::new();
        nested.add_discount_provider(item("x"));
        assert!(group.add_discount_provider(nested.clone()));
        assert!(!group.add_discount_provider(nested));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_group_remove() {
        let mut group = DiscountGroup::new();
        group.add_discount_provider(item("a"));

        assert!(!group.remove_discount_provider(&item("missing").into()));
        assert!(group.remove_discount_provider(&item("a").into()));
        assert!(group.is_empty());
    }

    #[test]
    fn test_group_notify_fans_out_to_item_listeners() {
        let (recorder, listener) = recorder();
        let mut group = DiscountGroup::new();
        group.add_discount_provider(item("a"));
        group.add_discount_provider(item("b"));
        group.register_listener(listener);

        let event = DiscountProvidedEvent::new(Arc::new(
            Discount::fixed("broadcast", Money::from_units(2)).unwrap(),
        ));
        group.notify_listeners(&event);

        assert_eq!(seen(&recorder), vec!["broadcast", "broadcast"]);
    }
}
