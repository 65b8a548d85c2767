use crate::settings::{self, Field};
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use ndarray::Array2;
use numbuster_core as game;
use game::{CellCount, Coord, EventSink, GameEvent, LevelConfig, MessageCategory, RunSummary};
use game::{ToNdIndex, cell_coords, cell_index};
use std::time::Duration;
use web_time::Instant;
use yew::prelude::*;

/// What a single grid cell currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
struct CellView {
    text: String,
    eliminated: bool,
}

impl CellView {
    /// The number a tap on this cell reports, blank cells report none.
    fn shown(&self) -> Option<CellCount> {
        self.text.parse().ok()
    }
}

fn blank_cells(side: Coord) -> Array2<CellView> {
    Array2::default((side, side).to_nd_index())
}

fn millis(duration: Duration) -> u32 {
    duration.as_millis().try_into().unwrap_or(u32::MAX)
}

fn next_target_notice(label: CellCount, first: bool) -> String {
    if first {
        format!("First, hit {label}!")
    } else {
        format!("Next, hit {label}!")
    }
}

fn category_message(category: MessageCategory) -> &'static str {
    use MessageCategory::*;
    match category {
        FirstAttempt => "First attempt at this level!",
        NewRecord => "Congratulations, a new record!",
        NoImprovement => "Too bad, no new record.",
    }
}

fn previous_best_text(previous_best: Option<f64>) -> String {
    previous_best.map_or_else(|| "none".to_string(), |best| best.to_string())
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start,
    Tick,
    Tap(CellCount),
    ClearNotice,
    ShowResult,
    CloseResult,
    OpenSettings,
    FieldChanged(Field),
    ApplySettings,
    CancelSettings,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: CellCount,
    cell: CellView,
    callback: Callback<CellCount>,
}

#[function_component(CellTile)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        index,
        cell,
        callback,
    } = props.clone();

    let class = classes!("number", cell.eliminated.then_some("hit"));
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("cell {} clicked", index);
        callback.emit(index);
    });

    html! {
        <td {class} {onclick}>{cell.text}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub(crate) struct GameView {
    controller: game::TickController<LocalScoreStore>,
    cells: Array2<CellView>,
    notice: Option<String>,
    result: Option<RunSummary>,
    settings_open: bool,
    draft: Vec<Field>,
    ticker: Option<Interval>,
    notice_timeout: Option<Timeout>,
    result_timeout: Option<Timeout>,
}

impl GameView {
    fn apply_events(&mut self, ctx: &Context<Self>, events: Vec<GameEvent>) {
        let side = self.controller.config().side();
        if self.cells.nrows() != usize::from(side) {
            self.cells = blank_cells(side);
        }

        for event in events {
            match event {
                GameEvent::CellUpdated {
                    cell_index,
                    display_text,
                    eliminated,
                } => {
                    let cell = &mut self.cells[cell_coords(cell_index, side).to_nd_index()];
                    cell.text = display_text;
                    cell.eliminated = eliminated;
                }
                GameEvent::NextTarget { label, first } => {
                    self.notice = Some(next_target_notice(label, first));
                    let link = ctx.link().clone();
                    self.notice_timeout = Some(Timeout::new(millis(game::NOTICE_DURATION), move || {
                        link.send_message(Msg::ClearNotice)
                    }));
                }
                GameEvent::RunComplete(summary) => {
                    log::debug!("run complete, showing {} soon", summary.evaluation.score);
                    self.notice = None;
                    self.notice_timeout = None;
                    let link = ctx.link().clone();
                    self.result_timeout = Some(Timeout::new(
                        millis(game::RUN_COMPLETE_DELAY),
                        move || link.send_message(Msg::ShowResult),
                    ));
                }
            }
        }
    }

    /// Keeps exactly one interval alive while a run is in progress.
    fn sync_ticker(&mut self, ctx: &Context<Self>) {
        match (self.controller.is_running(), self.ticker.is_some()) {
            (true, false) => {
                let link = ctx.link().clone();
                let interval = self.controller.config().interval_ms();
                log::debug!("ticker started every {} ms", interval);
                self.ticker = Some(Interval::new(interval, move || {
                    link.send_message(Msg::Tick)
                }));
            }
            (false, true) => {
                log::debug!("ticker stopped");
                self.ticker = None;
            }
            _ => {}
        }
    }

    fn close_settings(&mut self, config: LevelConfig, events: &mut impl EventSink) {
        self.settings_open = false;
        config.local_save();
        self.controller.reconfigure(config, events);
    }

    fn result_view(&self, ctx: &Context<Self>) -> Html {
        let Some(summary) = &self.result else {
            return html! {};
        };
        let onclose = ctx.link().callback(|_: MouseEvent| Msg::CloseResult);

        html! {
            <dialog id="score" open={true}>
                <article>
                    <h2>{category_message(summary.message_category)}</h2>
                    <dl>
                        <dt>{"Score"}</dt>
                        <dd class="score">{summary.evaluation.score.to_string()}</dd>
                        <dt>{"Previous best"}</dt>
                        <dd class="prev-score">{previous_best_text(summary.evaluation.previous_best)}</dd>
                        <dt>{"Time"}</dt>
                        <dd class="duration">{summary.elapsed_label.clone()}</dd>
                        <dt>{"Hit rate"}</dt>
                        <dd class="hit-rate">{format!("{:.2}", summary.evaluation.hit_rate)}</dd>
                    </dl>
                    <footer>
                        <button onclick={onclose}>{"Close"}</button>
                    </footer>
                </article>
            </dialog>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config: LevelConfig = LocalOrDefault::local_or_default();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}, level: {}", seed, config.identity_key());

        let mut view = Self {
            controller: game::TickController::new(config, LocalScoreStore, seed),
            cells: blank_cells(config.side()),
            notice: None,
            result: None,
            settings_open: false,
            draft: settings::config_fields(&config),
            ticker: None,
            notice_timeout: None,
            result_timeout: None,
        };

        let mut events = Vec::new();
        view.controller.init_board(&mut events);
        view.apply_events(ctx, events);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let mut events = Vec::new();
        let updated = match msg {
            Start => {
                self.result = None;
                self.result_timeout = None;
                self.controller.start(Instant::now(), &mut events)
            }
            Tick => {
                self.controller.tick(&mut events);
                !events.is_empty()
            }
            Tap(index) => {
                let side = self.controller.config().side();
                let coords = cell_coords(index, side);
                let shown = self.cells[coords.to_nd_index()].shown();
                let outcome = self
                    .controller
                    .on_tap(index, shown, Instant::now(), &mut events);
                outcome.is_hit()
            }
            ClearNotice => {
                self.notice_timeout = None;
                self.notice.take().is_some()
            }
            ShowResult => {
                self.result_timeout = None;
                self.result = self.controller.last_summary().cloned();
                self.result.is_some()
            }
            CloseResult => self.result.take().is_some(),
            OpenSettings => {
                self.controller.suspend();
                self.draft = settings::config_fields(self.controller.config());
                self.settings_open = true;
                true
            }
            FieldChanged((name, value)) => {
                settings::set_field(&mut self.draft, name, value);
                false
            }
            ApplySettings => {
                let config = match settings::parse_fields(&self.draft) {
                    Ok(config) => config,
                    Err(err) => {
                        log::warn!("rejected level settings: {}", err);
                        *self.controller.config()
                    }
                };
                self.close_settings(config, &mut events);
                true
            }
            CancelSettings => {
                let config = *self.controller.config();
                self.close_settings(config, &mut events);
                true
            }
        };

        self.apply_events(ctx, events);
        self.sync_ticker(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use settings::SettingsView;
        use Msg::*;

        let side = self.controller.config().side();
        let running = self.controller.is_running();
        let notice = self.notice.clone().unwrap_or_default();

        let cb_start = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Start
        });
        let cb_show_settings = ctx.link().callback(|_: MouseEvent| OpenSettings);
        let cb_tap = ctx.link().callback(Tap);

        html! {
            <div class="numbuster">
                <nav>
                    <button id="start" disabled={running} onclick={cb_start}>{"Start"}</button>
                    <output class="notice">{notice}</output>
                    <small onclick={cb_show_settings}>{"···"}</small>
                </nav>
                <table class={classes!("board", running.then_some("running"))}>
                    {
                        for self.cells.outer_iter().enumerate().map(|(row, cells)| html! {
                            <tr>
                                {
                                    for cells.iter().enumerate().map(|(col, cell)| {
                                        let index = cell_index((row as Coord, col as Coord), side);
                                        html! {
                                            <CellTile {index} cell={cell.clone()} callback={cb_tap.clone()}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <SettingsView
                    open={self.settings_open}
                    fields={self.draft.clone()}
                    onchange={ctx.link().callback(FieldChanged)}
                    onapply={ctx.link().callback(|_: ()| ApplySettings)}
                    oncancel={ctx.link().callback(|_: ()| CancelSettings)}
                />
                {self.result_view(ctx)}
            </div>
        }
    }
}
