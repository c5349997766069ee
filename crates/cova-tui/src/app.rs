//! Application state management for the COVA terminal front end.
//!
//! This module contains the `App` struct that owns UI state, the data shown
//! on each tab, and coordination of background requests.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use cova_core::forms::{BookingForm, SignInForm, SignUpForm};
use cova_core::models::{bestsellers, Location, MenuItem, OrderRequest};
use cova_core::{ApiClient, Config};

use crate::form::{FormField, FormState};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 5;

// Booking form field order
pub const BOOKING_NAME: usize = 0;
pub const BOOKING_PHONE: usize = 1;
pub const BOOKING_EMAIL: usize = 2;
pub const BOOKING_DATE: usize = 3;
pub const BOOKING_TIME: usize = 4;
pub const BOOKING_GUESTS: usize = 5;
pub const BOOKING_NOTES: usize = 6;

// Order form field order
pub const ORDER_ADDRESS: usize = 0;
pub const ORDER_NOTES: usize = 1;

// Sign-in form field order
pub const SIGN_IN_EMAIL: usize = 0;
pub const SIGN_IN_PASSWORD: usize = 1;

// Sign-up form field order
pub const SIGN_UP_NAME: usize = 0;
pub const SIGN_UP_EMAIL: usize = 1;
pub const SIGN_UP_PHONE: usize = 2;
pub const SIGN_UP_PASSWORD: usize = 3;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Menu,
    Bestsellers,
    Booking,
    Order,
    Location,
    Account,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Menu,
        Tab::Bestsellers,
        Tab::Booking,
        Tab::Order,
        Tab::Location,
        Tab::Account,
    ];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Menu => "Menu",
            Tab::Bestsellers => "Bestsellers",
            Tab::Booking => "Book a Table",
            Tab::Order => "Online Orders",
            Tab::Location => "Location",
            Tab::Account => "Account",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Menu => Tab::Bestsellers,
            Tab::Bestsellers => Tab::Booking,
            Tab::Booking => Tab::Order,
            Tab::Order => Tab::Location,
            Tab::Location => Tab::Account,
            Tab::Account => Tab::Menu,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Menu => Tab::Account,
            Tab::Bestsellers => Tab::Menu,
            Tab::Booking => Tab::Bestsellers,
            Tab::Order => Tab::Booking,
            Tab::Location => Tab::Order,
            Tab::Account => Tab::Location,
        }
    }

    /// Tabs that hold a form
    pub fn has_form(&self) -> bool {
        matches!(self, Tab::Booking | Tab::Order | Tab::Account)
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Editing,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which account form is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// A form submission that talks to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    SignIn,
    SignUp,
    Booking,
    Order,
}

impl Submission {
    pub fn button_label(&self) -> &'static str {
        match self {
            Submission::SignIn => "Sign in",
            Submission::SignUp => "Sign up",
            Submission::Booking => "Reserve",
            Submission::Order => "Place Order",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            Submission::SignIn => "Signing in...",
            Submission::SignUp => "Creating...",
            Submission::Booking => "Submitting...",
            Submission::Order => "Placing...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Submission::SignIn => "Signed in successfully",
            Submission::SignUp => "Account created",
            Submission::Booking => "Booking requested!",
            Submission::Order => "Order placed!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Submission::SignIn => "Sign in failed",
            Submission::SignUp => "Sign up failed",
            Submission::Booking => "Booking failed. Please try again.",
            Submission::Order => "Order failed. Please sign in first.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Modal message shown after a submission completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned tasks through the MPSC channel.
enum TaskResult {
    /// Menu fetched on startup or reload
    Menu(Vec<MenuItem>),
    /// Location fetched on startup or reload
    Location(Location),
    /// Both fetches are done; `failed` if either of them errored
    LoadFinished { failed: bool },
    /// A form submission finished (request id, kind, error text on failure)
    Submitted {
        id: u64,
        kind: Submission,
        outcome: Result<(), String>,
    },
}

/// Handle to the one submission allowed in flight
struct InFlight {
    id: u64,
    kind: Submission,
    handle: JoinHandle<()>,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    config_path: Option<PathBuf>,
    pub api: ApiClient,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub auth_mode: AuthMode,
    pub authed: bool,
    pub menu_selection: usize,
    pub bestseller_selection: usize,

    // Data from the backend
    pub menu: Vec<MenuItem>,
    pub location: Option<Location>,

    // Forms
    pub booking_form: FormState,
    pub order_form: FormState,
    pub sign_in_form: FormState,
    pub sign_up_form: FormState,

    // Messages
    pub notification: Option<Notification>,
    pub status_message: Option<String>,
    reloading: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl App {
    /// Create the application. `config_path` is where the config is saved
    /// back to; `None` keeps changes in memory.
    pub fn new(config: Config, config_path: Option<PathBuf>, api: ApiClient) -> Self {
        let authed = match api.is_authenticated() {
            Ok(authed) => authed,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                false
            }
        };
        debug!(authed, base_url = api.base_url(), "App created");

        let mut sign_in_form = FormState::new(vec![
            FormField::text("Email", "Email").required(),
            FormField::text("Password", "Password").required().masked(),
        ]);
        if let Some(ref email) = config.last_email {
            sign_in_form.set_value(SIGN_IN_EMAIL, email.clone());
            sign_in_form.focus = SIGN_IN_PASSWORD;
        }

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            config_path,
            api,

            state: AppState::Normal,
            current_tab: Tab::Menu,
            auth_mode: AuthMode::SignIn,
            authed,
            menu_selection: 0,
            bestseller_selection: 0,

            menu: Vec::new(),
            location: None,

            booking_form: FormState::new(vec![
                FormField::text("Name", "Your name").required(),
                FormField::text("Phone", "Phone").required(),
                FormField::text("Email", "Email (optional)"),
                FormField::text("Date", "YYYY-MM-DD").required(),
                FormField::text("Time", "HH:MM").required(),
                FormField::text("Guests", "Guests (1-20)").required(),
                FormField::text("Notes", "Notes"),
            ]),
            order_form: FormState::new(vec![
                FormField::text("Address", "Delivery address"),
                FormField::text("Notes", "Notes"),
            ]),
            sign_in_form,
            sign_up_form: FormState::new(vec![
                FormField::text("Full name", "Full name").required(),
                FormField::text("Email", "Email").required(),
                FormField::text("Phone", "Phone"),
                FormField::text("Password", "Password").required().masked(),
            ]),

            notification: None,
            status_message: None,
            reloading: false,

            task_rx,
            task_tx,
            in_flight: None,
            next_request_id: 0,
        }
    }

    // =========================================================================
    // Data Loading
    // =========================================================================

    /// Fetch menu and location in the background. Failures are logged and
    /// leave the sections in their empty state.
    pub fn load_initial_data(&mut self) {
        info!("Loading menu and location");
        let api = self.api.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let (menu, location) = futures::join!(api.fetch_menu(), api.fetch_location());

            let failed = menu.is_err() || location.is_err();
            match menu {
                Ok(menu) => Self::send_result(&tx, TaskResult::Menu(menu)).await,
                Err(e) => warn!(error = %e, "Failed to load menu"),
            }
            match location {
                Ok(location) => Self::send_result(&tx, TaskResult::Location(location)).await,
                Err(e) => warn!(error = %e, "Failed to load location"),
            }
            Self::send_result(&tx, TaskResult::LoadFinished { failed }).await;
        });
    }

    /// Fetch menu and location again, reporting progress in the status bar
    pub fn reload(&mut self) {
        self.reloading = true;
        self.status_message = Some("Reloading...".to_string());
        self.load_initial_data();
    }

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            error!("Failed to send task result - channel closed");
        }
    }

    /// Drain finished background work into app state
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Menu(menu) => {
                debug!(count = menu.len(), "Menu loaded");
                self.menu = menu;
                self.menu_selection = self.menu_selection.min(self.menu.len().saturating_sub(1));
                self.bestseller_selection = 0;
            }
            TaskResult::Location(location) => {
                self.location = Some(location);
            }
            TaskResult::LoadFinished { failed } => {
                if self.reloading {
                    self.reloading = false;
                    self.status_message = failed.then(|| "Reload failed".to_string());
                }
            }
            TaskResult::Submitted { id, kind, outcome } => {
                match self.in_flight {
                    Some(ref in_flight) if in_flight.id == id => {}
                    _ => {
                        debug!(id, ?kind, "Ignoring result of cancelled request");
                        return;
                    }
                }
                self.in_flight = None;
                self.finish_submission(kind, outcome);
            }
        }
    }

    fn finish_submission(&mut self, kind: Submission, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                info!(?kind, "Submission succeeded");
                match kind {
                    Submission::SignIn => {
                        self.config.last_email =
                            Some(self.sign_in_form.value(SIGN_IN_EMAIL).trim().to_string());
                        self.save_config();
                        self.sign_in_form.clear_value(SIGN_IN_PASSWORD);
                        self.refresh_authed();
                    }
                    Submission::SignUp => {
                        self.sign_up_form.clear_value(SIGN_UP_PASSWORD);
                        self.refresh_authed();
                    }
                    Submission::Booking | Submission::Order => {}
                }
                self.state = AppState::Normal;
                self.notify(kind.success_message(), NotificationKind::Success);
            }
            Err(e) => {
                warn!(?kind, error = %e, "Submission failed");
                self.notify(kind.failure_message(), NotificationKind::Error);
            }
        }
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.notification = Some(Notification {
            message: message.to_string(),
            kind,
        });
    }

    fn refresh_authed(&mut self) {
        self.authed = match self.api.is_authenticated() {
            Ok(authed) => authed,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                false
            }
        };
    }

    fn save_config(&self) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    // =========================================================================
    // Submissions
    // =========================================================================

    /// The submission the current tab's form would make
    pub fn active_submission(&self) -> Option<Submission> {
        match self.current_tab {
            Tab::Booking => Some(Submission::Booking),
            Tab::Order => Some(Submission::Order),
            Tab::Account => Some(match self.auth_mode {
                AuthMode::SignIn => Submission::SignIn,
                AuthMode::SignUp => Submission::SignUp,
            }),
            _ => None,
        }
    }

    pub fn active_form(&self) -> Option<&FormState> {
        match self.current_tab {
            Tab::Booking => Some(&self.booking_form),
            Tab::Order => Some(&self.order_form),
            Tab::Account => Some(match self.auth_mode {
                AuthMode::SignIn => &self.sign_in_form,
                AuthMode::SignUp => &self.sign_up_form,
            }),
            _ => None,
        }
    }

    pub fn active_form_mut(&mut self) -> Option<&mut FormState> {
        match self.current_tab {
            Tab::Booking => Some(&mut self.booking_form),
            Tab::Order => Some(&mut self.order_form),
            Tab::Account => Some(match self.auth_mode {
                AuthMode::SignIn => &mut self.sign_in_form,
                AuthMode::SignUp => &mut self.sign_up_form,
            }),
            _ => None,
        }
    }

    /// The submission currently waiting on the backend
    pub fn busy(&self) -> Option<Submission> {
        self.in_flight.as_ref().map(|f| f.kind)
    }

    /// Validate the active form and send it. Invalid forms show their error
    /// inline and nothing is sent; a second submission while one is in
    /// flight is refused.
    pub fn submit(&mut self) {
        let Some(kind) = self.active_submission() else {
            return;
        };

        if let Some(busy) = self.busy() {
            self.status_message = Some(format!("Please wait: {}", busy.busy_label()));
            return;
        }

        let api = self.api.clone();
        let spawned = match kind {
            Submission::Booking => {
                let form = BookingForm {
                    name: self.booking_form.value(BOOKING_NAME).to_string(),
                    phone: self.booking_form.value(BOOKING_PHONE).to_string(),
                    email: self.booking_form.value(BOOKING_EMAIL).to_string(),
                    date: self.booking_form.value(BOOKING_DATE).to_string(),
                    time: self.booking_form.value(BOOKING_TIME).to_string(),
                    guests: self.booking_form.value(BOOKING_GUESTS).to_string(),
                    notes: self.booking_form.value(BOOKING_NOTES).to_string(),
                };
                form.validate().map(|booking| {
                    self.spawn_submission(kind, async move {
                        api.create_booking(&booking).await.map(|_| ())
                    })
                })
            }
            Submission::Order => {
                let order = OrderRequest::first_item(
                    &self.menu,
                    self.order_form.value(ORDER_ADDRESS).trim(),
                    self.order_form.value(ORDER_NOTES).trim(),
                );
                Ok(self.spawn_submission(kind, async move {
                    api.create_order(&order).await.map(|_| ())
                }))
            }
            Submission::SignIn => {
                let form = SignInForm {
                    email: self.sign_in_form.value(SIGN_IN_EMAIL).to_string(),
                    password: self.sign_in_form.value(SIGN_IN_PASSWORD).to_string(),
                };
                form.validate().map(|(email, password)| {
                    self.spawn_submission(kind, async move {
                        api.authenticate(&email, &password).await.map(|_| ())
                    })
                })
            }
            Submission::SignUp => {
                let form = SignUpForm {
                    name: self.sign_up_form.value(SIGN_UP_NAME).to_string(),
                    email: self.sign_up_form.value(SIGN_UP_EMAIL).to_string(),
                    phone: self.sign_up_form.value(SIGN_UP_PHONE).to_string(),
                    password: self.sign_up_form.value(SIGN_UP_PASSWORD).to_string(),
                };
                form.validate().map(|profile| {
                    self.spawn_submission(kind, async move {
                        api.register(&profile).await.map(|_| ())
                    })
                })
            }
        };

        if let Err(e) = spawned {
            debug!(?kind, error = %e, "Form rejected");
            if let Some(form) = self.active_form_mut() {
                form.error = Some(e.to_string());
            }
        }
    }

    fn spawn_submission<F>(&mut self, kind: Submission, request: F)
    where
        F: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.next_request_id += 1;
        let id = self.next_request_id;
        let tx = self.task_tx.clone();
        info!(id, ?kind, "Submitting");

        let handle = tokio::spawn(async move {
            let outcome = request.await.map_err(|e| format!("{:#}", e));
            Self::send_result(&tx, TaskResult::Submitted { id, kind, outcome }).await;
        });

        self.status_message = None;
        self.in_flight = Some(InFlight { id, kind, handle });
    }

    /// Abort the in-flight submission, if any. Returns whether one was cancelled.
    pub fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.handle.abort();
                info!(id = in_flight.id, kind = ?in_flight.kind, "Request cancelled");
                // A sign-in may have stored its token before the abort landed
                self.refresh_authed();
                self.status_message = Some("Request cancelled".to_string());
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn logout(&mut self) {
        if let Err(e) = self.api.logout() {
            error!(error = %e, "Failed to clear credential");
            self.status_message = Some("Logout failed".to_string());
            return;
        }
        self.authed = false;
        self.status_message = Some("Signed out".to_string());
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn bestsellers(&self) -> Vec<&MenuItem> {
        bestsellers(&self.menu)
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth_mode = match self.auth_mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
    }

    /// Enter form editing on tabs that have one
    pub fn start_editing(&mut self) {
        if self.current_tab.has_form() {
            self.state = AppState::Editing;
        }
    }

    /// Jump to the sign-in form
    pub fn start_sign_in(&mut self) {
        self.current_tab = Tab::Account;
        self.auth_mode = AuthMode::SignIn;
        self.state = AppState::Editing;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.state = AppState::Normal;
    }
}

// ============================================================================
// Tests
// ============================================================================
