use std::path::PathBuf;

use iced::widget::{button, column, container, horizontal_space, row, stack, text};
use iced::{border, Alignment, Background, Color, Element, Length, Shadow, Task, Theme};
use rfd::FileDialog;

mod catalog;
mod service;
mod state;
mod ui;

use service::RefreshedTokens;
use state::coordinator::Coordinator;
use state::data::{HistoryItem, ToastId, ToastKind, Transformation};
use state::history::HistoryStore;
use state::store::{DurableStore, SqliteStore, UnavailableStore};
use state::toast::{ToastQueue, TOAST_DURATION};
use state::view::{View, ViewAction};

/// Main application state
struct Restyle {
    /// View, session and current-transformation owner
    coordinator: Coordinator,
    /// Persisted transformation history
    history: HistoryStore,
    /// Live transient notifications
    toasts: ToastQueue,
    /// The photo currently being worked on
    captured_photo: Option<PathBuf>,
    /// Style picked in the studio, not yet applied
    selected_style: Option<Transformation>,
    /// The history item under review on the results screen
    current_result: Option<HistoryItem>,
    /// A transformation request is in flight
    transforming: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    StartCapture,
    BackToStudio,
    OpenHistory,
    ResetToLanding,

    // Capture
    PickPhoto,

    // Studio
    SelectStyle(String),
    ApplyStyle,
    StyleFinished(Result<String, String>),

    // Session
    AdoptSession(String),
    DismissTransferBanner,
    RefreshSession,
    SessionRefreshed(Result<RefreshedTokens, String>),
    SignOut,

    // History
    SelectHistoryItem(String),
    DeleteHistoryItem(String),
    ClearHistory,

    // Toasts
    DismissToast(ToastId),
    ToastExpired(ToastId),
}

impl Restyle {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // History survives a broken store, just not a restart
        let store: Box<dyn DurableStore> = match SqliteStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                eprintln!("⚠️  Durable storage unavailable: {}", e);
                Box::new(UnavailableStore)
            }
        };
        let history = HistoryStore::load(store);

        println!("🎨 Restyle initialized with {} past result(s)", history.items().len());

        // A deep link passed on launch carries a transferred session
        let transfer = std::env::args()
            .nth(1)
            .filter(|arg| arg.contains("access_token="));
        let task = match transfer {
            Some(payload) => Task::done(Message::AdoptSession(payload)),
            None => Task::none(),
        };

        (
            Restyle {
                coordinator: Coordinator::new(),
                history,
                toasts: ToastQueue::new(),
                captured_photo: None,
                selected_style: None,
                current_result: None,
                transforming: false,
            },
            task,
        )
    }

    /// Enqueue a toast and schedule its auto-expiry
    fn notify(&mut self, kind: ToastKind, message: impl Into<String>) -> Task<Message> {
        let id = self.toasts.push(kind, message);
        expire_later(id)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartCapture => {
                self.coordinator.apply(ViewAction::StartCapture);
                Task::none()
            }
            Message::BackToStudio => {
                self.coordinator.apply(ViewAction::BackToStudio);
                Task::none()
            }
            Message::OpenHistory => {
                self.coordinator.apply(ViewAction::OpenHistory);
                Task::none()
            }
            Message::ResetToLanding => {
                self.coordinator.reset();
                self.captured_photo = None;
                self.selected_style = None;
                self.current_result = None;
                self.transforming = false;
                Task::none()
            }

            Message::PickPhoto => {
                // Native picker, synchronous like the rest of the event loop
                let picked = FileDialog::new()
                    .set_title("Choose a photo")
                    .add_filter("Photos", &["jpg", "jpeg", "png", "webp"])
                    .pick_file();

                if let Some(path) = picked {
                    println!("📷 Photo accepted: {}", path.display());
                    self.captured_photo = Some(path);
                    // A new capture invalidates the result under review
                    self.selected_style = None;
                    self.current_result = None;
                    self.coordinator.clear_transformation();
                    self.coordinator.apply(ViewAction::PhotoAccepted);
                }
                Task::none()
            }

            Message::SelectStyle(id) => {
                self.selected_style = catalog::style_by_id(&id);
                Task::none()
            }
            Message::ApplyStyle => {
                let (Some(photo), Some(style)) =
                    (self.captured_photo.clone(), self.selected_style.clone())
                else {
                    return Task::none();
                };

                // Precondition: the Apply button is gated on is_authenticated()
                let token = self.coordinator.session().access_token();
                self.transforming = true;

                Task::perform(service::apply_style(token, photo, style), |result| {
                    Message::StyleFinished(result.map_err(|e| e.to_string()))
                })
            }
            Message::StyleFinished(Ok(result_url)) => {
                self.transforming = false;
                let Some(style) = self.selected_style.clone() else {
                    return Task::none();
                };

                // History write first, then the coordinator reads the item
                let update = self.history.add(style, result_url);

                let mut tasks = Vec::new();
                if let Err(e) = update.persist {
                    eprintln!("⚠️  History persist failed: {}", e);
                    tasks.push(self.notify(
                        ToastKind::Warning,
                        "Result kept for this session only — storage is unavailable.",
                    ));
                }

                self.coordinator
                    .set_current_transformation(update.value.transformation.clone());
                self.current_result = Some(update.value);
                self.coordinator.apply(ViewAction::TransformationCompleted);

                tasks.push(self.notify(ToastKind::Success, "Transformation complete"));
                Task::batch(tasks)
            }
            Message::StyleFinished(Err(message)) => {
                self.transforming = false;
                self.notify(ToastKind::Error, message)
            }

            Message::AdoptSession(payload) => {
                let toast = self
                    .coordinator
                    .adopt_transferred_session(&payload, &mut self.toasts);
                expire_later(toast)
            }
            Message::DismissTransferBanner => {
                self.coordinator.acknowledge_transfer();
                Task::none()
            }
            Message::RefreshSession => {
                // Precondition: the refresh control only renders with a session
                let refresh_token = self.coordinator.session().refresh_token();
                Task::perform(service::refresh_session(refresh_token), |result| {
                    Message::SessionRefreshed(result.map_err(|e| e.to_string()))
                })
            }
            Message::SessionRefreshed(Ok(tokens)) => {
                // In-place mutation; the bridge picks it up through "updated"
                self.coordinator.session().apply_refresh(
                    tokens.access_token,
                    tokens.refresh_token,
                    tokens.expires_in,
                );
                println!("🔑 Session refreshed");
                Task::none()
            }
            Message::SessionRefreshed(Err(message)) => {
                self.coordinator.record_auth_error(message.clone());
                self.notify(ToastKind::Error, message)
            }
            Message::SignOut => {
                self.coordinator.sign_out();
                self.notify(ToastKind::Info, "Signed out")
            }

            Message::SelectHistoryItem(id) => {
                if let Some(item) = self.history.get(&id).cloned() {
                    self.coordinator
                        .set_current_transformation(item.transformation.clone());
                    self.current_result = Some(item);
                    self.coordinator.apply(ViewAction::SelectHistoryItem);
                }
                Task::none()
            }
            Message::DeleteHistoryItem(id) => {
                let update = self.history.remove(&id);
                match update.persist {
                    Ok(()) => Task::none(),
                    Err(e) => {
                        eprintln!("⚠️  History persist failed: {}", e);
                        self.notify(ToastKind::Warning, "Deletion may not survive a restart.")
                    }
                }
            }
            Message::ClearHistory => {
                let update = self.history.clear_all();
                match update.persist {
                    Ok(()) => self.notify(ToastKind::Info, "History cleared"),
                    Err(e) => {
                        eprintln!("⚠️  History persist failed: {}", e);
                        self.notify(ToastKind::Warning, "History cleared for this session only.")
                    }
                }
            }

            // Manual dismissal and timer expiry race; dismiss is idempotent
            Message::DismissToast(id) | Message::ToastExpired(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let screen = match self.coordinator.current_view() {
            View::Landing => ui::screens::landing(self.coordinator.is_authenticated()),
            View::Capture => ui::screens::capture(),
            View::Studio => match &self.captured_photo {
                Some(photo) => ui::screens::studio(
                    photo,
                    self.selected_style.as_ref(),
                    self.transforming,
                    self.coordinator.is_authenticated() && self.selected_style.is_some(),
                ),
                None => ui::screens::capture(),
            },
            View::Results => {
                ui::screens::results(self.captured_photo.as_deref(), self.current_result.as_ref())
            }
            View::History => ui::screens::history(self.history.items()),
        };

        let mut page = column![self.header()];
        if let Some(banner) = self.transfer_banner() {
            page = page.push(banner);
        }
        page = page.push(screen);

        stack![page, ui::toast::overlay(self.toasts.toasts())].into()
    }

    /// Header with reset navigation and session status
    fn header(&self) -> Element<Message> {
        let session: Element<Message> = if self.coordinator.auth().is_authenticated {
            if self.coordinator.is_authenticated() {
                row![
                    text("● session active").size(13),
                    button(text("Sign out").size(13))
                        .on_press(Message::SignOut)
                        .padding(4),
                ]
                .spacing(8)
                .align_y(Alignment::Center)
                .into()
            } else {
                row![
                    text("session expired").size(13),
                    button(text("Refresh").size(13))
                        .on_press(Message::RefreshSession)
                        .padding(4),
                ]
                .spacing(8)
                .align_y(Alignment::Center)
                .into()
            }
        } else {
            text("guest").size(13).into()
        };

        row![
            button(text("Restyle").size(20))
                .on_press(Message::ResetToLanding)
                .padding(6),
            horizontal_space(),
            session,
        ]
        .spacing(12)
        .padding(10)
        .align_y(Alignment::Center)
        .into()
    }

    /// Banner shown while the session-transfer flag is raised
    fn transfer_banner(&self) -> Option<Element<Message>> {
        if !self.coordinator.auth().session_transferred {
            return None;
        }

        let (message, color) = match &self.coordinator.auth().error {
            Some(error) => (error.as_str(), Color::from_rgb(0.62, 0.16, 0.16)),
            None => (
                "Session adopted from your other device.",
                Color::from_rgb(0.16, 0.32, 0.55),
            ),
        };

        Some(
            container(
                row![
                    text(message).size(14),
                    horizontal_space(),
                    button(text("Dismiss").size(13))
                        .on_press(Message::DismissTransferBanner)
                        .padding(4),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
            .width(Length::Fill)
            .padding(8)
            .style(move |_theme| container::Style {
                text_color: Some(Color::WHITE),
                background: Some(Background::Color(color)),
                border: border::rounded(0.0),
                shadow: Shadow::default(),
            })
            .into(),
        )
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Restyle", Restyle::update, Restyle::view)
        .theme(Restyle::theme)
        .centered()
        .run_with(Restyle::new)
}

/// Schedule the auto-expiry of a toast
fn expire_later(id: ToastId) -> Task<Message> {
    Task::perform(
        async move {
            tokio::time::sleep(TOAST_DURATION).await;
            id
        },
        Message::ToastExpired,
    )
}
