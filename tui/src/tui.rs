//! TUI runner — crossterm/ratatui event loop with terminal setup and
//! cleanup.
//!
//! [`Tui`] owns the terminal, the navigation state machine, the REST
//! client, and the controller for whichever page is active. Page stores
//! set a shared dirty flag from their change listeners; the loop redraws
//! whenever the flag is set or input arrives. Navigation discards the
//! old page (and its store) and constructs a fresh one.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use htm_vault_core::types::SortOrder;
use htm_vault_core::VaultClient;

use crate::app::{App, PageState, PendingAction};
use crate::forms::FieldKind;
use crate::notification::NotificationCenter;
use crate::pages::{AddDevicePage, DeviceMode, DevicePage, SearchPage, WorkOrderPage};
use crate::views;


/// Milliseconds since the epoch, for notification timestamps.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}


/// The controller for the page currently on screen.
enum ActivePage {
    Search(SearchPage),
    AddDevice(AddDevicePage),
    Device(DevicePage),
    WorkOrder(WorkOrderPage),
}


/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    client: VaultClient,
    page: ActivePage,
    dirty: Rc<Cell<bool>>,
    notifications: NotificationCenter,
    tick_rate: Duration,
}


impl Tui {
    /// Enter raw mode and the alternate screen and set up the landing
    /// page. The client is built by the caller so that configuration
    /// failures surface before the terminal is touched.
    pub fn new(client: VaultClient) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let dirty = Rc::new(Cell::new(true));
        let page = ActivePage::Search(SearchPage::new(&dirty));

        Ok(Tui {
            terminal,
            app: App::new(),
            client,
            page,
            dirty,
            notifications: NotificationCenter::new(50),
            tick_rate: Duration::from_millis(250),
        })
    }

    /// Run the main event loop until quit is requested.
    pub fn run(&mut self) -> Result<(), io::Error> {
        loop {
            if self.dirty.replace(false) {
                self.draw()?;
            }

            if event::poll(self.tick_rate)? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }
                    // Ctrl-C always quits immediately.
                    if key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }
                    self.handle_key(key_event);
                    self.dirty.set(true);
                }
            } else {
                // Let success banners expire even with no input.
                self.dirty.set(true);
            }

            if self.app.should_quit() {
                break;
            }
        }

        self.shutdown()
    }

    /// Leave the alternate screen and restore the terminal.
    fn shutdown(&mut self) -> Result<(), io::Error> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Switch to a new page: fresh controller, fresh store, initial load.
    fn navigate(&mut self, state: PageState) {
        self.app.navigate_to(state.clone());
        self.page = self.build_page(&state);
        self.load_page();
    }

    /// Pop back to the previous page, rebuilding its controller.
    fn go_back(&mut self) {
        if self.app.back() {
            let state = self.app.state().clone();
            self.page = self.build_page(&state);
            self.load_page();
        }
    }

    fn build_page(&self, state: &PageState) -> ActivePage {
        match state {
            PageState::Search => ActivePage::Search(SearchPage::new(&self.dirty)),
            PageState::AddDevice => ActivePage::AddDevice(AddDevicePage::new(&self.dirty)),
            PageState::Device {
                control_number,
                order,
            } => ActivePage::Device(DevicePage::new(control_number, *order, &self.dirty)),
            PageState::WorkOrder { work_order_id } => {
                ActivePage::WorkOrder(WorkOrderPage::new(work_order_id, &self.dirty))
            }
        }
    }

    /// Run the new page's initial fetches, surfacing failures as error
    /// banners rather than tearing the UI down.
    fn load_page(&mut self) {
        let result = match &mut self.page {
            ActivePage::Search(_) => Ok(()),
            ActivePage::AddDevice(page) => page.load(&self.client),
            ActivePage::Device(page) => page.load(&self.client),
            ActivePage::WorkOrder(page) => page.load(&self.client),
        };
        if let Err(message) = result {
            self.notifications.error(&format!("Error: {}", message), now_ms());
        }
    }

    // -----------------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        // A pending confirmation captures all input first.
        if self.app.pending().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if let Some(action) = self.app.take_confirmed() {
                        self.execute_action(action);
                    }
                }
                _ => self.app.cancel_pending(),
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.handle_escape(),
            _ => match &mut self.page {
                ActivePage::Search(_) => self.handle_search_key(key),
                ActivePage::AddDevice(_) => self.handle_add_device_key(key),
                ActivePage::Device(_) => self.handle_device_key(key),
                ActivePage::WorkOrder(_) => self.handle_work_order_key(key),
            },
        }
    }

    /// Escape cancels an open form, otherwise navigates back.
    fn handle_escape(&mut self) {
        match &mut self.page {
            ActivePage::Device(page) => {
                if matches!(page.mode, DeviceMode::Viewing) {
                    self.go_back();
                } else {
                    page.cancel_form();
                }
            }
            ActivePage::WorkOrder(page) => {
                if page.form.is_none() {
                    self.go_back();
                } else {
                    page.cancel_edit();
                }
            }
            ActivePage::Search(page) => {
                if page.results_focused {
                    page.results_focused = false;
                } else {
                    self.app.request_quit();
                }
            }
            ActivePage::AddDevice(_) => self.go_back(),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        // Ctrl-N opens the add-device page from anywhere on search.
        if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.navigate(PageState::AddDevice);
            return;
        }

        let page = match &mut self.page {
            ActivePage::Search(page) => page,
            _ => return,
        };

        if page.results_focused {
            match key.code {
                KeyCode::Down => page.select_next(),
                KeyCode::Up => {
                    if page.selected == 0 {
                        page.results_focused = false;
                    } else {
                        page.select_prev();
                    }
                }
                KeyCode::Enter => {
                    if let Some(control_number) = page.selected_control_number() {
                        self.navigate(PageState::Device {
                            control_number,
                            order: SortOrder::default(),
                        });
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(ch) => page.criteria.push(ch),
            KeyCode::Backspace => {
                page.criteria.pop();
            }
            KeyCode::Enter => {
                self.notifications.clear_errors();
                let result = page.submit(&self.client);
                if let Err(message) = result {
                    self.notifications.error(&format!("Error: {}", message), now_ms());
                }
            }
            KeyCode::Down => {
                if page.results().map(|r| !r.is_empty()).unwrap_or(false) {
                    page.results_focused = true;
                }
            }
            _ => {}
        }
    }

    fn handle_add_device_key(&mut self, key: KeyEvent) {
        let page = match &mut self.page {
            ActivePage::AddDevice(page) => page,
            _ => return,
        };

        if key.code == KeyCode::Enter {
            self.notifications.clear_errors();
            let result = page.submit(&self.client);
            match result {
                Ok(device) => {
                    self.notifications
                        .success("Device successfully added.", now_ms());
                    self.navigate(PageState::Device {
                        control_number: device.control_number,
                        order: SortOrder::default(),
                    });
                }
                Err(message) => {
                    self.notifications.error(&format!("Error: {}", message), now_ms());
                }
            }
            return;
        }

        let changed = edit_form_key(&mut page.form, key);
        if let Some(name) = changed {
            page.on_field_changed(name);
        }
    }

    fn handle_device_key(&mut self, key: KeyEvent) {
        // Form mode first: keys edit the open form.
        let in_form = {
            let page = match &mut self.page {
                ActivePage::Device(page) => page,
                _ => return,
            };
            !matches!(page.mode, DeviceMode::Viewing)
        };

        if in_form {
            if key.code == KeyCode::Enter {
                self.notifications.clear_errors();
                let (result, success_body) = {
                    let page = match &mut self.page {
                        ActivePage::Device(page) => page,
                        _ => return,
                    };
                    if matches!(page.mode, DeviceMode::UpdateForm(_)) {
                        (
                            page.submit_update(&self.client),
                            "Device successfully updated.",
                        )
                    } else {
                        (
                            page.submit_work_order(&self.client),
                            "Work order successfully created",
                        )
                    }
                };
                match result {
                    Ok(()) => self.notifications.success(success_body, now_ms()),
                    Err(message) => self
                        .notifications
                        .error(&format!("Error: {}", message), now_ms()),
                }
                return;
            }

            let page = match &mut self.page {
                ActivePage::Device(page) => page,
                _ => return,
            };
            let changed = page.form_mut().and_then(|form| edit_form_key(form, key));
            if let Some(name) = changed {
                page.on_field_changed(name);
            }
            return;
        }

        // Record view.
        let page = match &mut self.page {
            ActivePage::Device(page) => page,
            _ => return,
        };
        match key.code {
            KeyCode::Char('u') => {
                if page.can_modify() {
                    self.notifications.clear_errors();
                    if let Err(message) = page.begin_update() {
                        self.notifications.error(&format!("Error: {}", message), now_ms());
                    }
                }
            }
            KeyCode::Char('w') => {
                if page.can_modify() {
                    self.notifications.clear_errors();
                    page.begin_work_order();
                }
            }
            KeyCode::Char('d') => {
                if page.can_modify() {
                    let control_number = page.control_number().to_string();
                    self.app
                        .request_confirmation(PendingAction::RetireDevice { control_number });
                }
            }
            KeyCode::Char('a') => {
                if page.can_reactivate() {
                    let control_number = page.control_number().to_string();
                    self.app
                        .request_confirmation(PendingAction::ReactivateDevice { control_number });
                }
            }
            KeyCode::Char('o') => {
                if let Err(message) = page.toggle_order(&self.client) {
                    self.notifications.error(&format!("Error: {}", message), now_ms());
                }
            }
            KeyCode::Char('r') => self.load_page(),
            KeyCode::Down => page.select_next(),
            KeyCode::Up => page.select_prev(),
            KeyCode::Enter => {
                if let Some(work_order_id) = page.selected_work_order_id() {
                    self.navigate(PageState::WorkOrder { work_order_id });
                }
            }
            _ => {}
        }
    }

    fn handle_work_order_key(&mut self, key: KeyEvent) {
        let in_form = {
            let page = match &mut self.page {
                ActivePage::WorkOrder(page) => page,
                _ => return,
            };
            page.form.is_some()
        };

        if in_form {
            if key.code == KeyCode::Enter {
                self.notifications.clear_errors();
                let result = {
                    let page = match &mut self.page {
                        ActivePage::WorkOrder(page) => page,
                        _ => return,
                    };
                    page.submit_edit(&self.client)
                };
                match result {
                    Ok(()) => self
                        .notifications
                        .success("Work order successfully updated.", now_ms()),
                    Err(message) => self
                        .notifications
                        .error(&format!("Error: {}", message), now_ms()),
                }
                return;
            }

            let page = match &mut self.page {
                ActivePage::WorkOrder(page) => page,
                _ => return,
            };
            if let Some(form) = page.form.as_mut() {
                edit_form_key(form, key);
            }
            return;
        }

        let page = match &mut self.page {
            ActivePage::WorkOrder(page) => page,
            _ => return,
        };
        match key.code {
            KeyCode::Char('e') => {
                if page.can_modify() {
                    self.notifications.clear_errors();
                    if let Err(message) = page.begin_edit() {
                        self.notifications.error(&format!("Error: {}", message), now_ms());
                    }
                }
            }
            KeyCode::Char('c') => {
                if page.can_modify() {
                    let work_order_id = page.work_order_id().to_string();
                    self.app
                        .request_confirmation(PendingAction::CloseWorkOrder { work_order_id });
                }
            }
            KeyCode::Char('r') => self.load_page(),
            _ => {}
        }
    }

    /// Execute a confirmed destructive action against the active page.
    fn execute_action(&mut self, action: PendingAction) {
        self.notifications.clear_errors();
        let outcome = match (&action, &mut self.page) {
            (PendingAction::RetireDevice { .. }, ActivePage::Device(page)) => page
                .retire(&self.client)
                .map(|()| "Device successfully retired."),
            (PendingAction::ReactivateDevice { .. }, ActivePage::Device(page)) => page
                .reactivate(&self.client)
                .map(|()| "Device successfully reactivated."),
            (PendingAction::CloseWorkOrder { .. }, ActivePage::WorkOrder(page)) => page
                .close(&self.client)
                .map(|()| "Work order successfully closed."),
            _ => return,
        };
        match outcome {
            Ok(body) => self.notifications.success(body, now_ms()),
            Err(message) => self
                .notifications
                .error(&format!("Error: {}", message), now_ms()),
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn draw(&mut self) -> Result<(), io::Error> {
        let width = self.terminal.size().map(|r| r.width as usize).unwrap_or(80);
        let mut lines = views::header(self.app.state().label(), self.client.base_url(), width);
        lines.push(String::new());

        match &self.page {
            ActivePage::Search(page) => {
                lines.push(format!("Search: {}_", page.criteria));
                lines.push(String::new());
                if let Some(results) = page.results() {
                    lines.extend(views::search_results(&results, page.selected, width));
                }
                lines.push(String::new());
                lines.push(views::key_hints(&[
                    ("enter", "search"),
                    ("↓", "results"),
                    ("ctrl-n", "add device"),
                    ("esc", "quit"),
                ]));
            }
            ActivePage::AddDevice(page) => {
                lines.extend(views::form(&page.form, "Add Device", width));
            }
            ActivePage::Device(page) => match &page.mode {
                DeviceMode::Viewing => {
                    if let Some(device) = page.device() {
                        lines.extend(views::device_detail(&device, width));
                    } else {
                        lines.push("Loading device ...".into());
                    }
                    lines.push(String::new());
                    lines.push(format!("Work Orders ({})", page.order.as_str()));
                    if let Some(work_orders) = page.work_orders() {
                        lines.extend(views::work_orders_table(
                            &work_orders,
                            page.selected_work_order,
                            width,
                        ));
                    } else {
                        lines.push("(loading work orders...)".into());
                    }
                    lines.push(String::new());
                    let mut hints: Vec<(&str, &str)> = Vec::new();
                    if page.can_modify() {
                        hints.push(("u", "update"));
                        hints.push(("w", "new work order"));
                        hints.push(("d", "retire"));
                    }
                    if page.can_reactivate() {
                        hints.push(("a", "reactivate"));
                    }
                    hints.push(("o", "sort order"));
                    hints.push(("enter", "open work order"));
                    hints.push(("esc", "back"));
                    lines.push(views::key_hints(&hints));
                }
                DeviceMode::UpdateForm(form) => {
                    lines.extend(views::form(
                        form,
                        &format!("Update Device {}", page.control_number()),
                        width,
                    ));
                }
                DeviceMode::WorkOrderForm(form) => {
                    lines.extend(views::form(
                        form,
                        &format!("New Work Order for {}", page.control_number()),
                        width,
                    ));
                }
            },
            ActivePage::WorkOrder(page) => {
                if let Some(form) = &page.form {
                    lines.extend(views::form(
                        form,
                        &format!("Update Work Order {}", page.work_order_id()),
                        width,
                    ));
                } else {
                    if let Some(work_order) = page.work_order() {
                        lines.extend(views::work_order_detail(&work_order, width));
                    } else {
                        lines.push("Loading work order ...".into());
                    }
                    lines.push(String::new());
                    let mut hints: Vec<(&str, &str)> = vec![];
                    if page.can_modify() {
                        hints.push(("e", "edit"));
                        hints.push(("c", "close"));
                    }
                    hints.push(("r", "refresh"));
                    hints.push(("esc", "back"));
                    lines.push(views::key_hints(&hints));
                }
            }
        }

        if let Some(pending) = self.app.pending() {
            lines.push(String::new());
            lines.push(format!("{} (y/n)", pending.prompt()));
        }

        if let Some(banner) = self.notifications.latest(now_ms()) {
            lines.push(String::new());
            lines.push(format!(
                "{}[{}] {}\x1b[0m",
                banner.kind.color(),
                banner.kind.label(),
                banner.body
            ));
        }

        let text = lines.join("\n");
        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Paragraph::new(text), area);
        })?;
        Ok(())
    }
}


/// Apply an editing key to a form: focus movement, text entry, select
/// cycling. Returns the name of a select field whose value changed so
/// the caller can cascade.
fn edit_form_key(
    form: &mut crate::forms::FormState,
    key: KeyEvent,
) -> Option<&'static str> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            None
        }
        KeyCode::Backspace => {
            form.backspace();
            None
        }
        KeyCode::Left => form.cycle_select(false),
        KeyCode::Right => form.cycle_select(true),
        KeyCode::Char(' ') => {
            if matches!(form.focused().kind, FieldKind::Select(_)) {
                form.cycle_select(true)
            } else {
                form.insert_char(' ');
                None
            }
        }
        KeyCode::Char(ch) => {
            form.insert_char(ch);
            None
        }
        _ => None,
    }
}
