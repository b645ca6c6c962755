use job_listings::{
    init_logger, render_stats, Application, Board, Config, EmployerRequest, JobId,
};
use tiny_bail::prelude::*;

/// Lists jobs. Arguments are `name=value` filters (`search`, `location`, `type`,
/// `experience`, `remote`), `sort=<mode>` and `pages=<n>`. Subcommands:
///
/// - `show <id>...`
/// - `apply <id> first=.. last=.. email=.. [phone=..] [cover=..]`
/// - `request company=.. contact=.. email=.. role=.. requirements=.. [budget=..]`
/// - `stats`
fn main() {
    init_logger(log::LevelFilter::Info);
    let config = r!(Config::load());
    let mut board = r!(Board::from_config(&config));

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let pairs = || args.iter().skip(1).filter_map(|x| x.split_once('='));
    match args.first().map(String::as_str) {
        Some("apply") => {
            let id = r!(r!(args.get(1)).parse::<JobId>());
            let application = pairs().fold(Application::default(), |x, (name, value)| {
                x.field(name, value)
            });
            let application_id = r!(r!(board.client()).submit_application(id, &application));
            match application_id {
                Some(application_id) => println!("Application {application_id} submitted"),
                None => println!("Application submitted"),
            }
        }
        Some("request") => {
            let request = pairs().fold(EmployerRequest::default(), |x, (name, value)| {
                x.field(name, value)
            });
            println!("{}", r!(r!(board.client()).submit_employer_request(&request)));
        }
        Some("stats") => print!("{}", render_stats(&r!(r!(board.client()).fetch_stats()))),
        Some("show") => {
            if !board.load() {
                board.list_jobs();
                return;
            }
            for id in &args[1..] {
                board.show_job(c!(id.parse::<JobId>()));
            }
        }
        _ => {
            board.load();
            board.apply_args(args.iter().map(String::as_str));
            board.list_jobs();
        }
    }
}
