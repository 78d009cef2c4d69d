use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut requests: Vec<NetworkRequest> = Vec::new();

    // The search prompt swallows typing until Enter or Esc.
    let ctrl_c = key_event.code == Char('c') && key_event.modifiers == KeyModifiers::CONTROL;
    if guard.state.search.editing && !ctrl_c {
        match key_event.code {
            KeyCode::Enter => requests.extend(guard.submit_search()),
            KeyCode::Esc => guard.stop_search(),
            KeyCode::Backspace => guard.search_pop(),
            Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                guard.search_push(c)
            }
            _ => {}
        }
        drop(guard);
        for request in requests {
            let _ = network_requests.send(request).await;
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => requests.extend(guard.update_tab(MenuItem::Skaters)),
        (_, Char('2'), _) => requests.extend(guard.update_tab(MenuItem::Goalies)),
        (_, Char('3'), _) => requests.extend(guard.update_tab(MenuItem::Teams)),
        (_, Char('4'), _) => requests.extend(guard.update_tab(MenuItem::Today)),
        (_, Char('5'), _) => requests.extend(guard.update_tab(MenuItem::Focus)),
        (_, Char('6'), _) => requests.extend(guard.update_tab(MenuItem::Search)),
        (_, Char('?'), _) => requests.extend(guard.update_tab(MenuItem::Help)),
        (_, KeyCode::Esc, _) if guard.state.detail.is_some() => guard.close_detail(),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Search and detail
        (_, Char('/'), _) => guard.start_search(),
        (_, KeyCode::Enter, _) => requests.extend(guard.open_detail()),

        // List navigation
        (_, Char('j') | KeyCode::Down, _) => guard.select_next(),
        (_, Char('k') | KeyCode::Up, _) => guard.select_prev(),

        // Data
        (_, Char('w'), _) => requests = guard.cycle_window(),
        (_, Char('R'), _) => requests = guard.force_refresh(),
        (tab, Char('r'), _) => requests.extend(tab.load_request()),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    for request in requests {
        let _ = network_requests.send(request).await;
    }
}
