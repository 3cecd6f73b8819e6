use std::env;
use std::process;

use domain::adapters::memory_source::InMemoryContentSource;
use domain::destination::DestinationPolicy;
use domain::form::{CampaignSubmission, SELECT_PAGE_KEY};
use domain::sanitize::sanitize;
use domain::service::CampaignService;
use domain::CoreError;

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  domain generate --source <s> --medium <m> --name <n> [--term <t>] [--content <c>] [--url <destination>]\n  domain sanitize <text>\n\nNotes:\n  - Without --url the parameters are printed for appending to your own URL.",
        domain::about()
    );
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1); // skip program name

    let Some(cmd) = args.next() else {
        print_usage();
        return Ok(());
    };

    match cmd.as_str() {
        "generate" => {
            // Parse flags of the form --<key> <value>
            let rest: Vec<String> = args.collect();
            let mut pairs: Vec<(String, String)> = Vec::new();
            let mut i = 0;
            while i < rest.len() {
                let key = match rest[i].as_str() {
                    "--source" => "source",
                    "--medium" => "medium",
                    "--term" => "term",
                    "--content" => "content",
                    "--name" => "name",
                    "--url" => SELECT_PAGE_KEY,
                    unk => return Err(format!("unknown argument: {}", unk)),
                };
                if i + 1 >= rest.len() {
                    return Err(format!("{} requires a value", rest[i]));
                }
                pairs.push((key.to_string(), rest[i + 1].clone()));
                i += 2;
            }

            // The CLI trusts --url; there is no page list to check against.
            let svc = CampaignService::new(
                InMemoryContentSource::new("http://localhost"),
                DestinationPolicy::Trusted,
            );
            let outcome = svc
                .generate(&CampaignSubmission::from_pairs(pairs))
                .map_err(|e| format!("generate failed: {}", e))?;
            match outcome.result {
                Ok(url) => {
                    println!("{}", url);
                    Ok(())
                }
                Err(missing) => {
                    for m in missing.iter() {
                        eprintln!("{}", m.message());
                    }
                    Err(CoreError::from(missing).to_string())
                }
            }
        }
        "sanitize" => {
            let Some(text) = args.next() else {
                return Err("missing <text> for sanitize".into());
            };
            println!("{}", sanitize(Some(&text)));
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
