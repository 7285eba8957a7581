use serprobe::app;
use serprobe::error::AppResult;

fn main() -> AppResult<()> {
    app::run()
}
