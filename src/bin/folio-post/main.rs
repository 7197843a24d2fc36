use std::fmt::{Display, Formatter};
use std::fs::{create_dir, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use folio::util::date::format_date;
use folio::util::slug::slugify;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,

    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// One-line summary of the post
    #[arg(short, long)]
    description: Option<String>,

    /// Post generation options
    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,

    /// Directory the post is written to, for file and dir outputs
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

#[derive(Clone, Debug, ValueEnum)]
enum PostOutput {
    /// Writes the new post to the stdout
    Stdout,
    /// Writes the new post to a single .mdx file
    File,
    /// Writes the new post to a directory with an index.mdx (posts with images)
    Dir,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PostOutput::Stdout => "stdout",
            PostOutput::File => "file",
            PostOutput::Dir => "dir",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize)]
struct NewPost<'a> {
    title: &'a str,
    description: &'a str,
    published_at: String,
    author: &'a str,
}

fn default_author() -> String {
    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}

fn render_post(title: &str, description: &str, author: &str, date: &NaiveDate) -> Result<String> {
    let front_matter = serde_yaml::to_string(&NewPost {
        title,
        description,
        published_at: format_date(date),
        author,
    })?;

    let mut buf = String::new();
    buf.push_str("---\n");
    buf.push_str(&front_matter);
    buf.push_str("---\n\n");
    buf.push_str("This is a body example\n");
    buf.push_str("Please remove it and replace with your content\n");
    Ok(buf)
}

fn post_name(title: &str, date: &NaiveDate) -> String {
    format!("{}_{}", date.format("%Y%m%d"), slugify(title))
}

fn write_post(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let mut file = File::create(path).with_context(|| format!("Error creating {}", path.display()))?;
    file.write_all(content.as_bytes())?;
    println!("Created {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let author = args.author.clone().unwrap_or_else(default_author);
    let description = args.description.as_deref().unwrap_or("Replace with a description");
    let date = Utc::now().date_naive();
    let post = render_post(&args.title, description, &author, &date)?;

    match args.output {
        PostOutput::Stdout => print!("{}", post),
        PostOutput::File => {
            let path = args.dir.join(format!("{}.mdx", post_name(&args.title, &date)));
            write_post(&path, &post)?;
        }
        PostOutput::Dir => {
            let dir = args.dir.join(post_name(&args.title, &date));
            create_dir(&dir).with_context(|| format!("Error creating directory {}", dir.display()))?;
            write_post(&dir.join("index.mdx"), &post)?;
        }
    }

    Ok(())
}
