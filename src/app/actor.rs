//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Startup fetches (health probe) and initial render
        let startup = self.state.startup();
        self.dispatch(startup);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, commands: Vec<NetworkCommand>) {
        for command in commands {
            let _ = self.network_tx.send(command);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::GoHome => {
                let cmds = self.state.go_home();
                self.dispatch(cmds);
            }
            UiEvent::GoSearch => {
                let cmds = self.state.go_search();
                self.dispatch(cmds);
            }
            UiEvent::GoBack => {
                let cmds = self.state.go_back();
                self.dispatch(cmds);
            }
            UiEvent::Refresh => {
                let cmds = self.state.refresh();
                self.dispatch(cmds);
            }

            // Query editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::SubmitSearch => {
                let cmds = self.state.submit_search();
                self.dispatch(cmds);
            }

            // List selection
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::Activate => {
                let cmds = self.state.activate_selected();
                self.dispatch(cmds);
            }

            // Reader paging
            UiEvent::NextPage => self.state.next_page(),
            UiEvent::PrevPage => self.state.prev_page(),
            UiEvent::FirstPage => self.state.first_page(),
            UiEvent::LastPage => self.state.last_page(),

            // Goto popup
            UiEvent::OpenGoto => self.state.open_goto(),
            UiEvent::GotoChar(c) => self.state.goto_char(c),
            UiEvent::GotoBackspace => self.state.goto_backspace(),
            UiEvent::SubmitGoto => {
                let cmds = self.state.submit_goto();
                self.dispatch(cmds);
            }
            UiEvent::CancelGoto => self.state.cancel_goto(),

            // Help popup
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
