use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::runtime::Handle;

use crate::app::App;
use crate::controller::{lock, run_submission};
use crate::errors::SubmitRejected;
use crate::form::parse_number;
use crate::models::{Field, FieldEdit, FocusArea, TextField, TextKind};
use crate::utils::format_price;

const MAX_NUMBER_LEN: usize = 6;

/// Applies one key press. Returns `Ok(false)` when the user asked to quit.
pub fn handle_key(key: KeyEvent, app: &mut App, handle: &Handle) -> Result<bool> {
    if key.kind != KeyEventKind::Press {
        return Ok(true);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(false);
    }

    let focus = app.focus_area();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Ok(false),
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.focus_prev(),
        KeyCode::Enter => submit(app, handle),
        KeyCode::Char('c') => copy_price(app),
        KeyCode::Left => step_field(app, focus, -1),
        KeyCode::Right => step_field(app, focus, 1),
        KeyCode::Char(' ') => match focus {
            FocusArea::Field(Field::Flag(flag)) => {
                let mut ctl = lock(&app.controller);
                let checked = ctl.form().flag(flag);
                ctl.update(FieldEdit::Flag(flag, !checked));
            }
            FocusArea::Field(Field::Text(_)) => step_field(app, focus, 1),
            FocusArea::Submit => submit(app, handle),
        },
        KeyCode::Backspace => {
            if let Some(field) = number_field(focus) {
                let mut ctl = lock(&app.controller);
                let mut value = ctl.form().text(field).to_string();
                value.pop();
                ctl.update(FieldEdit::Text(field, value));
            }
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '.' => {
            if let Some(field) = number_field(focus) {
                let mut ctl = lock(&app.controller);
                let mut value = ctl.form().text(field).to_string();
                if value.len() < MAX_NUMBER_LEN {
                    value.push(ch);
                    ctl.update(FieldEdit::Text(field, value));
                }
            }
        }
        _ => {}
    }
    Ok(true)
}

fn number_field(focus: FocusArea) -> Option<TextField> {
    match focus {
        FocusArea::Field(Field::Text(field)) if matches!(field.kind(), TextKind::Number(_)) => {
            Some(field)
        }
        _ => None,
    }
}

/// Cycles a select box or nudges a number input by one step.
fn step_field(app: &mut App, focus: FocusArea, direction: i32) {
    let FocusArea::Field(Field::Text(field)) = focus else {
        return;
    };
    let mut ctl = lock(&app.controller);
    let current = ctl.form().text(field).to_string();
    let next = match field.kind() {
        TextKind::Select(options) => cycle_option(&current, options, direction),
        TextKind::Number(bounds) => {
            format!("{:.1}", bounds.nudge(parse_number(current.trim()), direction))
        }
    };
    ctl.update(FieldEdit::Text(field, next));
}

pub fn cycle_option(current: &str, options: &[&str], direction: i32) -> String {
    if options.is_empty() {
        return String::new();
    }
    let len = options.len() as i32;
    let next = match options.iter().position(|o| *o == current) {
        Some(i) => (i as i32 + direction).rem_euclid(len),
        None if direction >= 0 => 0,
        None => len - 1,
    };
    options[next as usize].to_string()
}

/// Starts a submission on the runtime if the form allows it.
fn submit(app: &mut App, handle: &Handle) {
    app.notice = None;
    let submission = {
        let mut ctl = lock(&app.controller);
        match ctl.begin_submit() {
            Ok(submission) => submission,
            Err(SubmitRejected::Busy) => {
                tracing::debug!("submit ignored, request in flight");
                return;
            }
            Err(SubmitRejected::Invalid(errors)) => {
                tracing::debug!(problems = errors.len(), "submit blocked by form constraints");
                return;
            }
        }
    };
    handle.spawn(run_submission(
        app.controller.clone(),
        app.client.clone(),
        submission,
    ));
}

fn copy_price(app: &mut App) {
    let price = {
        let ctl = lock(&app.controller);
        match ctl.result() {
            Some(prediction) if prediction.is_displayable() => {
                format_price(prediction.local_price, &app.currency)
            }
            _ => return,
        }
    };
    let copied = Clipboard::new().and_then(|mut cb| cb.set_text(price.clone()));
    app.notice = Some(match copied {
        Ok(()) => format!("Copied {price} to clipboard"),
        Err(err) => {
            tracing::warn!(error = %err, "clipboard unavailable");
            "Clipboard unavailable".to_string()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::form::tests::dell_notebook;
    use crate::models::{FlagField, Phase};
    use crate::network::PredictionClient;
    use crate::options::COMPANIES;
    use axum::{Router, extract::State, routing::post};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use tokio::sync::{Mutex as AsyncMutex, oneshot};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(controller: Controller, endpoint: &str) -> App {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        App::new(
            controller,
            PredictionClient::with_http_client(endpoint, http),
            "LKR",
        )
    }

    #[derive(Clone)]
    struct HeldService {
        hits: Arc<AtomicUsize>,
        arrived: Arc<AsyncMutex<Option<oneshot::Sender<()>>>>,
        release: Arc<AsyncMutex<Option<oneshot::Receiver<()>>>>,
    }

    async fn count_and_hold(State(service): State<HeldService>) -> &'static str {
        service.hits.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = service.arrived.lock().await.take() {
            let _ = tx.send(());
        }
        if let Some(rx) = service.release.lock().await.take() {
            let _ = rx.await;
        }
        r#"{"prediction": 500}"#
    }

    /// Counts requests and holds the first reply until `release` fires.
    struct Counting {
        endpoint: String,
        hits: Arc<AtomicUsize>,
        arrived: oneshot::Receiver<()>,
        release: oneshot::Sender<()>,
    }

    fn spawn_counting_service(rt: &Runtime) -> Counting {
        let hits = Arc::new(AtomicUsize::new(0));
        let (arrived_tx, arrived) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        let service = HeldService {
            hits: hits.clone(),
            arrived: Arc::new(AsyncMutex::new(Some(arrived_tx))),
            release: Arc::new(AsyncMutex::new(Some(release_rx))),
        };
        let endpoint = rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let app = Router::new()
                .route("/predict", post(count_and_hold))
                .with_state(service);
            tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });
            format!("http://{addr}/predict")
        });
        Counting { endpoint, hits, arrived, release }
    }

    fn wait_until_settled(rt: &Runtime, app: &App) {
        rt.block_on(async {
            for _ in 0..200 {
                if !lock(&app.controller).is_loading() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            panic!("submission never settled");
        });
    }

    #[test]
    fn quit_keys() {
        let rt = Runtime::new().unwrap();
        let mut app = app_with(Controller::new(355.49), "http://127.0.0.1:9/predict");
        assert!(!handle_key(press(KeyCode::Char('q')), &mut app, rt.handle()).unwrap());
        assert!(!handle_key(press(KeyCode::Esc), &mut app, rt.handle()).unwrap());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_key(ctrl_c, &mut app, rt.handle()).unwrap());
        assert!(handle_key(press(KeyCode::Tab), &mut app, rt.handle()).unwrap());
    }

    #[test]
    fn select_cycles_through_options() {
        let rt = Runtime::new().unwrap();
        let mut app = app_with(Controller::new(355.49), "http://127.0.0.1:9/predict");
        handle_key(press(KeyCode::Right), &mut app, rt.handle()).unwrap();
        assert_eq!(lock(&app.controller).form().company, COMPANIES[0]);
        handle_key(press(KeyCode::Left), &mut app, rt.handle()).unwrap();
        assert_eq!(lock(&app.controller).form().company, COMPANIES[COMPANIES.len() - 1]);
        assert_eq!(cycle_option("", COMPANIES, -1), "Other");
        assert_eq!(cycle_option("Other", COMPANIES, 1), "Dell");
    }

    #[test]
    fn typing_edits_number_fields_only() {
        let rt = Runtime::new().unwrap();
        let mut app = app_with(Controller::new(355.49), "http://127.0.0.1:9/predict");
        handle_key(press(KeyCode::Char('1')), &mut app, rt.handle()).unwrap();
        assert!(lock(&app.controller).form().company.is_empty());

        app.focus = 4; // inches
        for ch in ['1', '5', '.', '6', '7'] {
            handle_key(press(KeyCode::Char(ch)), &mut app, rt.handle()).unwrap();
        }
        handle_key(press(KeyCode::Backspace), &mut app, rt.handle()).unwrap();
        assert_eq!(lock(&app.controller).form().inches, "15.6");

        handle_key(press(KeyCode::Right), &mut app, rt.handle()).unwrap();
        assert_eq!(lock(&app.controller).form().inches, "15.7");
    }

    #[test]
    fn space_toggles_checkbox() {
        let rt = Runtime::new().unwrap();
        let mut app = app_with(Controller::new(355.49), "http://127.0.0.1:9/predict");
        app.focus = 7; // IPS
        assert_eq!(app.focus_area(), FocusArea::Field(Field::Flag(FlagField::Ips)));
        handle_key(press(KeyCode::Char(' ')), &mut app, rt.handle()).unwrap();
        assert!(lock(&app.controller).form().ips);
        handle_key(press(KeyCode::Char(' ')), &mut app, rt.handle()).unwrap();
        assert!(!lock(&app.controller).form().ips);
    }

    #[test]
    fn enter_on_incomplete_form_sends_nothing() {
        let rt = Runtime::new().unwrap();
        let service = spawn_counting_service(&rt);
        let mut app = app_with(Controller::new(355.49), &service.endpoint);

        handle_key(press(KeyCode::Enter), &mut app, rt.handle()).unwrap();
        rt.block_on(async { tokio::time::sleep(Duration::from_millis(50)).await });

        assert_eq!(service.hits.load(Ordering::SeqCst), 0);
        let ctl = lock(&app.controller);
        assert_eq!(ctl.phase(), &Phase::Idle);
        assert!(!ctl.issues().is_empty());
    }

    #[test]
    fn enter_submits_once_and_settles() {
        let rt = Runtime::new().unwrap();
        let Counting { endpoint, hits, arrived, release } = spawn_counting_service(&rt);
        let mut app = app_with(Controller::with_form(dell_notebook(), 355.49), &endpoint);

        handle_key(press(KeyCode::Enter), &mut app, rt.handle()).unwrap();
        rt.block_on(arrived).expect("request reached the service");
        assert!(lock(&app.controller).is_loading());

        // busy: a second Enter is ignored
        handle_key(press(KeyCode::Enter), &mut app, rt.handle()).unwrap();
        assert!(lock(&app.controller).is_loading());

        release.send(()).expect("release");
        wait_until_settled(&rt, &app);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let ctl = lock(&app.controller);
        assert_eq!(ctl.phase(), &Phase::Succeeded);
        let price = ctl.result().unwrap().local_price;
        assert_eq!(format_price(price, "LKR"), "LKR 177,745");
    }
}
