use anyhow::{anyhow, bail, Context};
use std::io::{self, Write};
use std::path::PathBuf;
use teamsheet_core::{
    Event, EventRecorder, OptionView, PickerId, RngState, SlotKind, SlotSpec, SlotSummary,
    TeamSheet,
};
use teamsheet_data::{load_team, PlayerDef};

const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Debug, Clone)]
struct CliOptions {
    assets: PathBuf,
    seed: u64,
    scheme: Option<String>,
    auto: bool,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut assets = PathBuf::from("assets");
    let mut seed = DEFAULT_SEED;
    let mut scheme = None;
    let mut auto = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto" => auto = true,
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    match value.parse::<u64>() {
                        Ok(parsed) => seed = parsed,
                        Err(_) => log::warn!("ignoring bad seed {value}"),
                    }
                    idx += 1;
                }
            }
            "--scheme" => {
                if let Some(value) = args.get(idx + 1) {
                    scheme = Some(value.clone());
                    idx += 1;
                }
            }
            other => log::warn!("unknown option {other}"),
        }
        idx += 1;
    }
    CliOptions {
        assets,
        seed,
        scheme,
        auto,
    }
}

/// Logs every call the engine makes on a slot's view.
struct ConsoleView {
    label: String,
}

impl OptionView<PlayerDef> for ConsoleView {
    fn init_options(&mut self, values: &[PlayerDef]) {
        log::trace!("{}: offering {} players", self.label, values.len());
    }

    fn remove_option_at(&mut self, position: usize) {
        log::trace!("{}: remove row {position}", self.label);
    }

    fn insert_option_at(&mut self, value: &PlayerDef, position: usize) {
        log::trace!("{}: insert {value} at row {position}", self.label);
    }

    fn select_option_at(&mut self, position: Option<usize>) {
        match position {
            Some(position) => log::trace!("{}: select row {position}", self.label),
            None => log::trace!("{}: blank", self.label),
        }
    }

    fn highlight(&mut self) {
        log::trace!("{}: next to fill", self.label);
    }

    fn dehighlight(&mut self) {
        log::trace!("{}: no longer next", self.label);
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        log::trace!("{}: controls enabled={enabled}", self.label);
    }
}

struct Session {
    squad: String,
    sheet: TeamSheet<PlayerDef>,
    recorder: EventRecorder,
    rng: RngState,
}

enum Flow {
    Continue,
    Quit,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let mut session = build_session(&options)?;
    if options.auto {
        let picks = session.sheet.autofill(&mut session.rng)?;
        println!("autofill made {picks} picks (seed {})", session.rng.seed());
        print_sheet(&session);
        print_events(&session);
        return Ok(());
    }
    println!(
        "{} | scheme {} | seed {}",
        session.squad,
        session.sheet.active_scheme().unwrap_or("-"),
        session.rng.seed()
    );
    print_help();
    while let Some(line) = read_line("> ") {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match execute(&mut session, cmd, &args) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => println!("error: {err:#}"),
        }
        print_events(&session);
    }
    Ok(())
}

fn build_session(options: &CliOptions) -> anyhow::Result<Session> {
    let (config, squad, pools) = load_team(&options.assets)
        .with_context(|| format!("load team from {}", options.assets.display()))?;
    let mut sheet = TeamSheet::new(config, pools, |spec: &SlotSpec<'_>| {
        Box::new(ConsoleView {
            label: spec.label.to_string(),
        }) as Box<dyn OptionView<PlayerDef>>
    })?;
    if let Some(scheme) = &options.scheme {
        sheet.apply_scheme(scheme)?;
    }
    let recorder = EventRecorder::new();
    sheet.observe_all(&recorder)?;
    Ok(Session {
        squad: squad.name,
        sheet,
        recorder,
        rng: RngState::from_seed(options.seed),
    })
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
}

fn execute(session: &mut Session, cmd: &str, args: &[&str]) -> anyhow::Result<Flow> {
    match cmd {
        "help" | "h" | "?" => print_help(),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "show" | "ls" => print_sheet(session),
        "json" => {
            let summaries = session.sheet.summaries();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        "options" | "o" => {
            let slot = slot_arg(session, args, 0)?;
            print_options(session, slot)?;
        }
        "pick" | "p" => {
            let slot = slot_arg(session, args, 0)?;
            let position = position_arg(args, 1)?;
            session.sheet.lineup_mut().pick(slot, position)?;
        }
        "set" => {
            let slot = slot_arg(session, args, 0)?;
            let query = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            if query.is_empty() {
                bail!("usage: set <slot> <player name or number>");
            }
            let player = find_player(session, slot, &query)?;
            session.sheet.lineup_mut().set_selection(slot, Some(&player))?;
        }
        "clear" | "c" => {
            let slot = slot_arg(session, args, 0)?;
            session.sheet.lineup_mut().clear_selection(slot)?;
        }
        "swap" => {
            let role = text_arg(args, 0, "role")?;
            let first = position_arg(args, 1)?;
            let second = position_arg(args, 2)?;
            session.sheet.swap(role, first, second)?;
        }
        "promote" => {
            let role = text_arg(args, 0, "role")?;
            let substitute = position_arg(args, 1)?;
            let starter = position_arg(args, 2)?;
            session.sheet.promote(role, substitute, starter)?;
        }
        "scheme" => {
            let name = text_arg(args, 0, "scheme")?;
            session.sheet.apply_scheme(name)?;
            println!("scheme {name}");
        }
        "auto" => {
            let picks = session.sheet.autofill(&mut session.rng)?;
            println!("autofill made {picks} picks");
        }
        other => bail!("unknown command {other}, try help"),
    }
    Ok(Flow::Continue)
}

fn text_arg<'a>(args: &[&'a str], index: usize, what: &str) -> anyhow::Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| anyhow!("missing {what}"))
}

fn slot_arg(session: &Session, args: &[&str], index: usize) -> anyhow::Result<PickerId> {
    let label = text_arg(args, index, "slot")?;
    Ok(session.sheet.slot(label)?)
}

/// Positions are typed 1-based and used 0-based.
fn position_arg(args: &[&str], index: usize) -> anyhow::Result<usize> {
    let raw = text_arg(args, index, "position")?;
    let value: usize = raw
        .parse()
        .with_context(|| format!("bad position {raw}"))?;
    value
        .checked_sub(1)
        .ok_or_else(|| anyhow!("positions start at 1"))
}

fn find_player(session: &Session, slot: PickerId, query: &str) -> anyhow::Result<PlayerDef> {
    let picker = session.sheet.lineup().picker(slot)?;
    let pool = picker
        .pool()
        .ok_or_else(|| anyhow!("slot {} has no players", picker.label()))?;
    let number = query.parse::<u8>().ok();
    pool.iter()
        .find(|player| Some(player.number) == number || player.name.eq_ignore_ascii_case(query))
        .cloned()
        .ok_or_else(|| anyhow!("no player {query} for {}", picker.label()))
}

fn print_help() {
    println!("Commands:");
    println!("  show|ls                      list every slot");
    println!("  options|o <slot>             numbered players a slot can take");
    println!("  pick|p <slot> <n>            pick the n-th offered player");
    println!("  set <slot> <name|number>     pick a player by name or shirt number");
    println!("  clear|c <slot>               empty a slot");
    println!("  swap <role> <a> <b>          swap two filled substitutes");
    println!("  promote <role> <sub> <slot>  move a substitute into a starter slot");
    println!("  scheme <name>                switch formation");
    println!("  auto                         fill every open slot at random");
    println!("  json                         dump the sheet as JSON");
    println!("  quit|exit|q                  leave");
}

fn print_sheet(session: &Session) {
    let scheme = session.sheet.active_scheme().unwrap_or("-");
    println!("{} ({scheme})", session.squad);
    let summaries = session.sheet.summaries();
    for role in session.sheet.roles() {
        println!("{} / {}", role.id, role.label);
        for summary in summaries.iter().filter(|summary| summary.role == role.id) {
            println!("  {}", format_summary(summary));
        }
    }
}

fn format_summary(summary: &SlotSummary) -> String {
    let marker = match (summary.kind, summary.active, summary.next_fillable) {
        (_, false, _) => "x",
        (SlotKind::Substitute, _, true) => ">",
        _ => " ",
    };
    let content = match (&summary.selection, summary.active) {
        (Some(player), _) => player.clone(),
        (None, false) => "(unused)".to_string(),
        (None, true) => format!("- ({} available)", summary.offered.len()),
    };
    format!("{marker} {:<7} {content}", summary.label)
}

fn print_options(session: &Session, slot: PickerId) -> anyhow::Result<()> {
    let lineup = session.sheet.lineup();
    let picker = lineup.picker(slot)?;
    let selected = picker.selection();
    for (position, player) in picker.offered().into_iter().enumerate() {
        let mark = if Some(player) == selected { "*" } else { " " };
        println!("{mark}{:>3}. {player} ({})", position + 1, player.role);
    }
    if !picker.controls_enabled() {
        println!("  ({} is not open for picks)", picker.label());
    }
    Ok(())
}

fn print_events(session: &Session) {
    for event in session.recorder.drain() {
        let label = |picker: PickerId| session.sheet.label_of(picker).unwrap_or("?").to_string();
        match event {
            Event::SelectionMade { picker } => println!("event: {} filled", label(picker)),
            Event::SelectionCleared { picker } => println!("event: {} emptied", label(picker)),
            Event::BecameFilled { member, .. } => {
                println!("event: bench filled up to {}", label(member))
            }
            Event::BecameEmpty { member, .. } => {
                println!("event: bench shrank, {} now empty", label(member))
            }
        }
    }
}
