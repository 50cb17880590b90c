use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_appender::rolling;

use hrm_portal::api::{self, ApiClient};
use hrm_portal::attendance::tracker::manual_from_times;
use hrm_portal::attendance::{AttendanceSnapshot, AttendanceTracker, ledger};
use hrm_portal::auth::session::Session;
use hrm_portal::auth::token_store::FileTokenStore;
use hrm_portal::config::Config;
use hrm_portal::dashboard;
use hrm_portal::error::PortalError;
use hrm_portal::model::RequestStatus;
use hrm_portal::model::announcement::AnnouncementDraft;
use hrm_portal::model::attendance::PunchEvent;
use hrm_portal::model::holiday::HolidayDraft;
use hrm_portal::model::leave_request::{CreateLeave, LeaveType, StatusUpdate};
use hrm_portal::model::payment_request::CreatePaymentRequest;
use hrm_portal::model::wfh::CreateWfh;
use hrm_portal::utils::time::{SystemClock, format_clock, format_duration};

#[derive(Parser)]
#[command(name = "hrm-portal", version, about = "Attendance, leave and request portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Today's attendance plus pending counts
    Dashboard,
    #[command(subcommand)]
    Attendance(AttendanceCmd),
    #[command(subcommand)]
    Leave(LeaveCmd),
    #[command(subcommand)]
    Wfh(WfhCmd),
    #[command(subcommand)]
    Payment(PaymentCmd),
    #[command(subcommand)]
    Announcement(AnnouncementCmd),
    #[command(subcommand)]
    Holiday(HolidayCmd),
    #[command(subcommand)]
    Profile(ProfileCmd),
}

#[derive(Subcommand)]
enum AttendanceCmd {
    Status,
    PunchIn,
    PunchOut,
    /// Live elapsed time while punched in, until Ctrl-C
    Watch,
    History {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Correct a past day
    Manual {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long = "in", value_parser = parse_hhmm)]
        punch_in: NaiveTime,
        #[arg(long = "out", value_parser = parse_hhmm)]
        punch_out: Option<NaiveTime>,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
enum LeaveCmd {
    Mine,
    All,
    Apply {
        #[arg(long = "type")]
        leave_type: LeaveType,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        reason: String,
    },
    Approve { id: String },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
enum WfhCmd {
    Mine,
    All,
    Apply {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        reason: String,
    },
    Approve { id: String },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
enum PaymentCmd {
    Mine,
    All,
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        required_by: NaiveDate,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "")]
        document_url: String,
    },
    Status { id: String, status: RequestStatus },
    Delete { id: String },
}

#[derive(Subcommand)]
enum AnnouncementCmd {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "all")]
        audience: String,
        #[arg(long)]
        important: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "all")]
        audience: String,
        #[arg(long)]
        important: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum HolidayCmd {
    List {
        #[arg(long)]
        year: Option<i32>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long = "type", default_value = "government")]
        holiday_type: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        recurring: bool,
    },
    Delete { id: String },
    /// Seed the government holidays for a year
    Init {
        #[arg(long)]
        year: i32,
    },
}

#[derive(Subcommand)]
enum ProfileCmd {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|e| format!("expected HH:MM, {e}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Rolling daily log; stdout belongs to the command output
    let file_appender = rolling::daily(&config.log_dir, "portal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(api = %config.api_base_url, "portal starting");

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            match e.downcast_ref::<PortalError>() {
                Some(pe) if pe.requires_login() => {
                    eprintln!("{pe}");
                    eprintln!("Log in with: hrm-portal login --email <EMAIL> --password <PASSWORD>");
                }
                Some(pe) => eprintln!("{pe}"),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let session = Session::load(Box::new(FileTokenStore::new(&config.token_file)))
        .context("loading session")?;
    let client = ApiClient::new(&config, Arc::new(session))?;
    let new_tracker = || AttendanceTracker::new(client.clone(), Arc::new(SystemClock), config.tick_interval);

    match cli.command {
        Command::Login { email, password } => {
            let user = api::auth::login(&client, &email, &password).await?;
            println!("Logged in as {} ({})", user.display_name(), user.role);
        }
        Command::Logout => {
            api::auth::logout(&client).await?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = client.session().require()?;
            println!("{} ({}) id={}", user.display_name(), user.role, user.id);
        }
        Command::Dashboard => {
            let user = client.session().require()?;
            let mut tracker = new_tracker();
            if user.role.is_admin() {
                let board = dashboard::admin(&client, &mut tracker).await?;
                println!("Total employees:  {}", board.employee_count);
                println!("Pending requests: {}", board.pending_requests);
                print_today(&board.today, &tracker);
            } else {
                let board = dashboard::employee(&client, &mut tracker).await?;
                println!("Pending requests: {}", board.pending_requests);
                print_today(&board.today, &tracker);
            }
        }
        Command::Attendance(cmd) => attendance(&client, new_tracker(), cmd).await?,
        Command::Leave(cmd) => leave(&client, cmd).await?,
        Command::Wfh(cmd) => wfh(&client, cmd).await?,
        Command::Payment(cmd) => payment(&client, cmd).await?,
        Command::Announcement(cmd) => announcement(&client, cmd).await?,
        Command::Holiday(cmd) => holiday(&client, cmd).await?,
        Command::Profile(cmd) => profile(&client, cmd).await?,
    }
    Ok(())
}

fn local_hhmm(punch: &PunchEvent) -> String {
    punch.time.with_timezone(&Local).format("%H:%M").to_string()
}

fn print_today(snapshot: &AttendanceSnapshot, tracker: &AttendanceTracker) {
    println!("Today's attendance: {}", snapshot.status);
    for punch in &snapshot.punches {
        println!("  {:<3} {}", punch.kind, local_hhmm(punch));
    }
    if snapshot.can_punch_out {
        println!("Elapsed: {}", format_duration(tracker.elapsed()));
    }
    println!("Worked today: {}", format_duration(tracker.worked_today()));
    println!(
        "Punch in: {}  Punch out: {}",
        if snapshot.can_punch_in { "available" } else { "-" },
        if snapshot.can_punch_out { "available" } else { "-" },
    );
}

async fn attendance(client: &ApiClient, mut tracker: AttendanceTracker, cmd: AttendanceCmd) -> anyhow::Result<()> {
    client.session().require()?;

    match cmd {
        AttendanceCmd::Status => {
            tracker.load().await?;
            print_today(tracker.snapshot(), &tracker);
        }
        AttendanceCmd::PunchIn => {
            tracker.load().await?;
            tracker.punch_in().await?;
            print_today(tracker.snapshot(), &tracker);
        }
        AttendanceCmd::PunchOut => {
            tracker.load().await?;
            tracker.punch_out().await?;
            print_today(tracker.snapshot(), &tracker);
        }
        AttendanceCmd::Watch => {
            tracker.load().await?;
            print_today(tracker.snapshot(), &tracker);
            if !tracker.is_ticking() {
                println!("Not punched in; nothing to time.");
                return Ok(());
            }

            let mut rx = tracker.watch_elapsed();
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            let mut stdout = std::io::stdout();
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let elapsed = *rx.borrow_and_update();
                        write!(stdout, "\rElapsed: {}", format_clock(elapsed))?;
                        stdout.flush()?;
                    }
                    _ = &mut ctrl_c => {
                        writeln!(stdout)?;
                        break;
                    }
                }
            }
        }
        AttendanceCmd::History { month, year } => {
            let now = Local::now();
            let month = month.unwrap_or(now.month());
            let year = year.unwrap_or(now.year());
            let records = api::attendance::my_attendance(client, month, year).await?;
            if records.is_empty() {
                println!("No attendance recorded for {year}-{month:02}");
            }
            for record in &records {
                let punches: Vec<String> = ledger::punches(Some(record))
                    .iter()
                    .map(|p| format!("{} {}", p.kind, local_hhmm(p)))
                    .collect();
                let status = record.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{}  {:<8} {}", record.date, status, punches.join(", "));
            }
        }
        AttendanceCmd::Manual { date, punch_in, punch_out, reason } => {
            let request = manual_from_times(date, punch_in, punch_out, reason)?;
            let record = tracker.manual_punch(&request).await?;
            println!("Manual punch recorded for {}", record.date);
        }
    }
    Ok(())
}

async fn leave(client: &ApiClient, cmd: LeaveCmd) -> anyhow::Result<()> {
    client.session().require()?;

    let leaves = match cmd {
        LeaveCmd::Mine => api::leave_request::my_leaves(client).await?,
        LeaveCmd::All => {
            client.session().require_admin()?;
            api::leave_request::list(client).await?
        }
        LeaveCmd::Apply { leave_type, from, to, reason } => {
            let body = CreateLeave { start_date: from, end_date: to, leave_type, reason };
            vec![api::leave_request::create(client, &body).await?]
        }
        LeaveCmd::Approve { id } => {
            client.session().require_admin()?;
            vec![api::leave_request::set_status(client, &id, &StatusUpdate::approve()).await?]
        }
        LeaveCmd::Reject { id, reason } => {
            client.session().require_admin()?;
            vec![api::leave_request::set_status(client, &id, &StatusUpdate::reject(reason)).await?]
        }
    };

    for l in &leaves {
        let who = l.employee.as_ref().map(|e| e.name.as_str()).unwrap_or("");
        println!(
            "{}  {:<8} {} .. {}  {:<9} {} {}",
            l.id, l.leave_type, l.start_date, l.end_date, l.status, who, l.reason
        );
    }
    Ok(())
}

async fn wfh(client: &ApiClient, cmd: WfhCmd) -> anyhow::Result<()> {
    client.session().require()?;

    let requests = match cmd {
        WfhCmd::Mine => api::wfh::my_requests(client).await?,
        WfhCmd::All => {
            client.session().require_admin()?;
            api::wfh::list(client).await?
        }
        WfhCmd::Apply { date, reason } => vec![api::wfh::create(client, &CreateWfh { date, reason }).await?],
        WfhCmd::Approve { id } => {
            client.session().require_admin()?;
            vec![api::wfh::set_status(client, &id, &StatusUpdate::approve()).await?]
        }
        WfhCmd::Reject { id, reason } => {
            client.session().require_admin()?;
            vec![api::wfh::set_status(client, &id, &StatusUpdate::reject(reason)).await?]
        }
    };

    for w in &requests {
        let who = w.employee.as_ref().map(|e| e.name.as_str()).unwrap_or("");
        println!("{}  {}  {:<9} {} {}", w.id, w.date, w.status, who, w.reason);
    }
    Ok(())
}

async fn payment(client: &ApiClient, cmd: PaymentCmd) -> anyhow::Result<()> {
    client.session().require()?;

    let requests = match cmd {
        PaymentCmd::Mine => api::payment_request::my_requests(client).await?,
        PaymentCmd::All => {
            client.session().require_admin()?;
            api::payment_request::list(client).await?
        }
        PaymentCmd::Create {
            project,
            department,
            purpose,
            amount,
            required_by,
            description,
            document_url,
        } => {
            let body = CreatePaymentRequest {
                project_name: project,
                department,
                purpose,
                amount,
                description,
                required_by_date: required_by,
                document_url,
            };
            vec![api::payment_request::create(client, &body).await?]
        }
        PaymentCmd::Status { id, status } => {
            client.session().require_admin()?;
            vec![api::payment_request::set_status(client, &id, status).await?]
        }
        PaymentCmd::Delete { id } => {
            api::payment_request::delete(client, &id).await?;
            println!("Deleted payment request {id}");
            Vec::new()
        }
    };

    for p in &requests {
        let due = p.required_by_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {:<20} {:>12.2}  due {}  {:<9} {}",
            p.id, p.project_name, p.amount, due, p.status, p.purpose
        );
    }
    Ok(())
}

async fn announcement(client: &ApiClient, cmd: AnnouncementCmd) -> anyhow::Result<()> {
    client.session().require()?;

    match cmd {
        AnnouncementCmd::List => {
            for a in api::announcement::list(client).await? {
                let flag = if a.is_important { "!" } else { " " };
                println!("{flag} {}  [{}] {}", a.id, a.target_audience, a.title);
                println!("    {}", a.content);
            }
        }
        AnnouncementCmd::Create { title, content, audience, important } => {
            client.session().require_admin()?;
            let draft = AnnouncementDraft { title, content, target_audience: audience, is_important: important };
            let created = api::announcement::create(client, &draft).await?;
            println!("Created announcement {}", created.id);
        }
        AnnouncementCmd::Update { id, title, content, audience, important } => {
            client.session().require_admin()?;
            let draft = AnnouncementDraft { title, content, target_audience: audience, is_important: important };
            api::announcement::update(client, &id, &draft).await?;
            println!("Updated announcement {id}");
        }
        AnnouncementCmd::Delete { id } => {
            client.session().require_admin()?;
            api::announcement::delete(client, &id).await?;
            println!("Deleted announcement {id}");
        }
    }
    Ok(())
}

async fn holiday(client: &ApiClient, cmd: HolidayCmd) -> anyhow::Result<()> {
    client.session().require()?;

    match cmd {
        HolidayCmd::List { year } => {
            let year = year.unwrap_or_else(|| Local::now().year());
            for h in api::holiday::list(client, year).await? {
                let recurring = if h.recurring { " (recurring)" } else { "" };
                println!("{}  {}  {:<10} {}{}", h.id, h.date, h.holiday_type, h.name, recurring);
            }
        }
        HolidayCmd::Add { name, date, holiday_type, description, recurring } => {
            client.session().require_admin()?;
            let draft = HolidayDraft { name, date, holiday_type, description, recurring };
            let created = api::holiday::create(client, &draft).await?;
            println!("Added holiday {} on {}", created.name, created.date);
        }
        HolidayCmd::Delete { id } => {
            client.session().require_admin()?;
            api::holiday::delete(client, &id).await?;
            println!("Deleted holiday {id}");
        }
        HolidayCmd::Init { year } => {
            client.session().require_admin()?;
            api::holiday::initialize(client, year).await?;
            println!("Government holidays initialized for {year}");
        }
    }
    Ok(())
}

async fn profile(client: &ApiClient, cmd: ProfileCmd) -> anyhow::Result<()> {
    client.session().require()?;

    let profile = match cmd {
        ProfileCmd::Show => api::user::me(client).await?,
        ProfileCmd::Update { name, department, position, contact_number, address } => {
            let mut profile = api::user::me(client).await?;
            let edits = [
                (&mut profile.name, name),
                (&mut profile.department, department),
                (&mut profile.position, position),
                (&mut profile.contact_number, contact_number),
                (&mut profile.address, address),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    *field = value;
                }
            }
            api::user::update_profile(client, &profile).await?
        }
    };

    println!("Name:       {}", profile.name);
    println!("Email:      {}", profile.email);
    println!("Department: {}", profile.department);
    println!("Position:   {}", profile.position);
    println!("Contact:    {}", profile.contact_number);
    println!("Address:    {}", profile.address);
    Ok(())
}
