use job_listings::{
    init_logger, render_admin, AdminJobs, ApiClient, Config, FilterPatch, JobId, JobSource,
    SortMode,
};
use tiny_bail::prelude::*;

/// Prints the admin job table. `toggle=<id>` and `delete=<id>` edit the loaded
/// collection before listing; `status`, `search`, `type` and `sort` shape the table.
fn main() {
    init_logger(log::LevelFilter::Info);
    let config = r!(Config::load());
    let source = match config.api_base_url.clone() {
        Some(url) => JobSource::Api(r!(ApiClient::new(url, config.timeout()))),
        None => JobSource::Featured,
    };
    let mut admin = AdminJobs::new(r!(source.load()), config.page_size);

    let mut patch = FilterPatch::new();
    let mut pages = 1usize;
    for arg in std::env::args().skip(1) {
        let (name, value) = cq!(arg.split_once('='));
        match name {
            "toggle" => {
                c!(admin.toggle_status(c!(value.parse::<JobId>())));
            }
            "delete" => {
                c!(admin.delete(c!(value.parse::<JobId>())));
            }
            "sort" => admin.engine_mut().set_sort(SortMode::parse(value)),
            "pages" => pages = value.parse().unwrap_or(1),
            _ => patch = patch.field(name, value),
        }
    }
    admin.engine_mut().set_filter(patch);
    admin.engine_mut().load_pages(pages);

    print!("{}", render_admin(&admin));
}
