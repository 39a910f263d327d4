//! Interactive menu screens.
//!
//! All input comes through an injected `BufRead`, so every flow can be
//! scripted in tests; output goes straight to stdout. Service calls go
//! through the shared client and a timed-out service is always reported as
//! such, never as an empty result.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use serde_json::Value;
use tracing::warn;
use tunedeck_common::client::ServiceClient;
use tunedeck_common::config;
use tunedeck_common::dataset::Dataset;
use tunedeck_common::envelope::{Request, Response};
use tunedeck_common::liked::{self, LikedSong};
use tunedeck_common::song::{RawDuration, SongRecord};
use tunedeck_common::{Error, Result};

use crate::store::AccountStore;

/// Starter genres for the playlist view.
const GENRES: &[&str] = &["Rock", "Pop", "Jazz", "Hip-Hop", "Classical"];

/// Clients for the four backend services.
pub struct ServiceEndpoints {
    pub recommend: ServiceClient,
    pub random: ServiceClient,
    pub song_by_year: ServiceClient,
    pub total_duration: ServiceClient,
}

impl ServiceEndpoints {
    /// Clients bound to the default fixed addresses.
    pub fn from_defaults() -> Self {
        Self {
            recommend: ServiceClient::new(config::RECOMMEND_ADDR),
            random: ServiceClient::new(config::RANDOM_ADDR),
            song_by_year: ServiceClient::new(config::SONG_BY_YEAR_ADDR),
            total_duration: ServiceClient::new(config::TOTAL_DURATION_ADDR),
        }
    }
}

/// The menu-driven UI over one input source.
pub struct Ui<R: BufRead> {
    input: R,
    root: PathBuf,
    accounts: AccountStore,
    services: ServiceEndpoints,
    dataset: Option<Dataset>,
}

impl<R: BufRead> Ui<R> {
    pub fn new(
        input: R,
        root: PathBuf,
        accounts: AccountStore,
        services: ServiceEndpoints,
        dataset: Option<Dataset>,
    ) -> Self {
        Self {
            input,
            root,
            accounts,
            services,
            dataset,
        }
    }

    /// Top-level loop: welcome -> home -> back to welcome on logout.
    pub async fn run(&mut self) -> Result<()> {
        println!("=== Welcome to Tunedeck ===");
        println!("Organize your favorite music and enrich it from the song services.\n");
        loop {
            match self.welcome_screen()? {
                Some(username) => {
                    if self.home_screen(&username).await? {
                        println!("Goodbye!");
                        return Ok(());
                    }
                }
                None => {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        }
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        print!("{text}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(line.trim().to_owned())
    }

    // ----- Accounts -----

    fn welcome_screen(&mut self) -> Result<Option<String>> {
        loop {
            if self.accounts.is_empty() {
                println!("[1] Login (no accounts yet - please register first)");
            } else {
                println!("[1] Login");
            }
            println!("[2] Register");
            println!("[Q] Quit");
            match self.prompt("Select an option: ")?.to_uppercase().as_str() {
                "1" => {
                    if self.accounts.is_empty() {
                        println!("No accounts found. Please register first.\n");
                    } else if let Some(username) = self.login_screen()? {
                        return Ok(Some(username));
                    }
                }
                "2" => self.register_screen()?,
                "Q" => return Ok(None),
                _ => println!("Invalid input. Please enter [1], [2], or [Q].\n"),
            }
        }
    }

    fn register_screen(&mut self) -> Result<()> {
        println!("\n=== Register a New Account ===");
        loop {
            let username = self.prompt("Enter a username (or [B] Back): ")?;
            if username.eq_ignore_ascii_case("b") {
                return Ok(());
            }
            let password = self.prompt("Enter a password (min 6 chars): ")?;
            match self.accounts.register(&username, &password) {
                Ok(()) => {
                    println!("Account '{username}' registered. You can now log in.\n");
                    return Ok(());
                }
                Err(e) => println!("{e}\n"),
            }
        }
    }

    fn login_screen(&mut self) -> Result<Option<String>> {
        loop {
            println!("\n=== Login ===");
            println!("Enter your credentials, [B] Back, or [R] Register");
            let username = self.prompt("Username: ")?;
            if username.eq_ignore_ascii_case("b") {
                return Ok(None);
            }
            if username.eq_ignore_ascii_case("r") {
                self.register_screen()?;
                continue;
            }
            let password = self.prompt("Password: ")?;
            if self.accounts.verify(&username, &password) {
                println!("\nLogin successful!\n");
                return Ok(Some(username));
            }
            println!("Invalid credentials. Try again or [B] to go back.\n");
        }
    }

    // ----- Home -----

    /// Returns true when the user chose to quit the program.
    async fn home_screen(&mut self, username: &str) -> Result<bool> {
        loop {
            println!("=== Home Menu ===");
            println!("Welcome, {username}!");
            println!("[1] Add a Song");
            println!("[2] View Playlist by Genre");
            println!("[3] Lookup Song");
            println!("[4] Delete a Song");
            println!("[5] Get Song Recommendations");
            println!("[6] Surprise Me (Random Song)");
            println!("[7] Song From a Year");
            println!("[8] Total Listening Time");
            println!("[L] Logout");
            println!("[Q] Quit Program\n");

            match self.prompt("Select an option: ")?.to_uppercase().as_str() {
                "1" => self.add_song_screen(username)?,
                "2" => self.view_by_genre_screen(username)?,
                "3" => self.song_lookup_screen(username)?,
                "4" => self.delete_song_screen(username)?,
                "5" => self.recommendation_screen(username).await?,
                "6" => self.random_song_screen(username).await?,
                "7" => self.song_by_year_screen(username).await?,
                "8" => self.total_duration_screen(username).await?,
                "L" => {
                    if self.confirm("Are you sure you want to logout?")? {
                        println!("Logging out...\n");
                        return Ok(false);
                    }
                }
                "Q" => {
                    if self.confirm("Are you sure you want to quit?")? {
                        return Ok(true);
                    }
                }
                _ => println!("Invalid option.\n"),
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            match self
                .prompt(&format!("{question} [Y] = Yes, [N] = No: "))?
                .to_uppercase()
                .as_str()
            {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                _ => println!("Please enter [Y] or [N].\n"),
            }
        }
    }

    // ----- Collection curation -----

    fn add_song_screen(&mut self, username: &str) -> Result<()> {
        loop {
            println!("\n=== Add a Song ===");
            let title = self.prompt("Enter song title (or [B] Back): ")?;
            if title.eq_ignore_ascii_case("b") {
                println!("Cancelled add song.\n");
                return Ok(());
            }
            if title.is_empty() {
                println!("Title cannot be empty.\n");
                continue;
            }
            let artist = self.prompt("Enter artist name (or [B] Back): ")?;
            if artist.eq_ignore_ascii_case("b") {
                println!("Cancelled add song.\n");
                return Ok(());
            }
            if artist.is_empty() {
                println!("Artist cannot be empty.\n");
                continue;
            }
            if self.confirm_add_song(username, &title, &artist)? {
                return Ok(());
            }
            // [R] Reenter: fall through to the top of the loop
        }
    }

    /// Returns false when the user asked to re-enter the song info.
    fn confirm_add_song(&mut self, username: &str, title: &str, artist: &str) -> Result<bool> {
        // Fill in genre, year, and duration from the local dataset when we can.
        let found = self
            .dataset
            .as_ref()
            .and_then(|d| d.find_song(title, artist))
            .cloned();
        let genre = found
            .as_ref()
            .map(|s| s.genre.clone())
            .unwrap_or_else(|| "Unknown".to_owned());
        let year = found.as_ref().and_then(|s| s.year);
        let duration = found.as_ref().and_then(|s| match &s.duration {
            // Dataset durations are integer milliseconds; liked entries keep
            // the legacy "<ms> ms" text form.
            Some(RawDuration::Int(ms)) => Some(RawDuration::Text(format!("{ms} ms"))),
            Some(other) => Some(other.clone()),
            None => None,
        });

        loop {
            println!("\nYou entered:");
            println!("Title:    {title}");
            println!("Artist:   {artist}");
            println!("Genre:    {genre}");
            println!(
                "Year:     {}",
                year.map_or_else(|| "Unknown".to_owned(), |y| y.to_string())
            );
            println!("Duration: {}", display_duration(duration.as_ref()));
            println!(
                "\nIf you confirm, this song is added to your liked songs and \
                 appears in the '{genre}' playlist."
            );
            match self
                .prompt("Add this song? ([Y] = Yes, [N] = No, [R] = Reenter info): ")?
                .to_uppercase()
                .as_str()
            {
                "Y" => {
                    let entry = LikedSong {
                        song: SongRecord {
                            title: title.to_owned(),
                            artist: artist.to_owned(),
                            genre: genre.clone(),
                            year,
                            duration: duration.clone(),
                            popularity: None,
                        },
                        date_added: Some(today()),
                    };
                    self.append_liked(username, entry)?;
                    println!("'{title}' added to your liked songs.\n");
                    return Ok(true);
                }
                "N" => {
                    println!("Song addition cancelled.\n");
                    return Ok(true);
                }
                "R" => return Ok(false),
                _ => println!("Please enter [Y], [N], or [R].\n"),
            }
        }
    }

    fn view_by_genre_screen(&mut self, username: &str) -> Result<()> {
        loop {
            println!("\n=== View Playlist by Genre ===");
            for (i, genre) in GENRES.iter().enumerate() {
                println!("{}. {genre}", i + 1);
            }
            let choice = self.prompt("Select genre number (or [B] Back): ")?;
            if choice.eq_ignore_ascii_case("b") {
                return Ok(());
            }
            let Some(genre) = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| GENRES.get(i))
            else {
                println!("Invalid selection.\n");
                continue;
            };

            let songs: Vec<LikedSong> = self
                .load_liked(username)?
                .into_iter()
                .filter(|s| s.song.genre == *genre)
                .collect();
            println!("\n=== {genre} Playlist ===");
            if songs.is_empty() {
                println!("No songs in the {genre} playlist.");
                continue;
            }
            for (i, entry) in songs.iter().enumerate() {
                println!("{}. {} - {}", i + 1, entry.song.title, entry.song.artist);
            }
            let choice = self.prompt("Select song number for details, or [B] Back: ")?;
            if choice.eq_ignore_ascii_case("b") {
                continue;
            }
            match choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| songs.get(i))
            {
                Some(entry) => print_song_info(entry),
                None => println!("Invalid selection.\n"),
            }
        }
    }

    fn song_lookup_screen(&mut self, username: &str) -> Result<()> {
        loop {
            println!("\n=== Song Lookup ===");
            let query = self.prompt("Enter song title to search (or [B] Back): ")?;
            if query.eq_ignore_ascii_case("b") {
                return Ok(());
            }
            if query.is_empty() {
                println!("Please enter a song title or [B] to go back.\n");
                continue;
            }
            let needle = query.to_lowercase();
            let matches: Vec<LikedSong> = self
                .load_liked(username)?
                .into_iter()
                .filter(|s| s.song.title.to_lowercase().contains(&needle))
                .collect();

            match matches.len() {
                0 => {
                    println!("No songs found matching '{query}'.");
                    if !self.confirm("Try another search?")? {
                        return Ok(());
                    }
                }
                1 => print_song_info(&matches[0]),
                n => {
                    println!("\nFound {n} songs matching '{query}':");
                    for (i, entry) in matches.iter().enumerate() {
                        println!("{}. {} - {}", i + 1, entry.song.title, entry.song.artist);
                    }
                    let choice = self.prompt("Select song number for details, or [B] Back: ")?;
                    if let Some(entry) = choice
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| matches.get(i))
                    {
                        print_song_info(entry);
                    }
                }
            }
        }
    }

    fn delete_song_screen(&mut self, username: &str) -> Result<()> {
        println!("\n=== Delete a Song ===");
        let mut songs = self.load_liked(username)?;
        if songs.is_empty() {
            println!("You have no liked songs to delete.\n");
            return Ok(());
        }
        for (i, entry) in songs.iter().enumerate() {
            println!(
                "{}. {} - {} ({})",
                i + 1,
                entry.song.title,
                entry.song.artist,
                entry.song.genre
            );
        }
        let choice = self.prompt("Select song number to delete, or [B] Back: ")?;
        if choice.eq_ignore_ascii_case("b") {
            return Ok(());
        }
        let Some(index) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < songs.len())
        else {
            println!("Invalid selection.\n");
            return Ok(());
        };

        println!("\nYou selected to delete:");
        println!("Title:  {}", songs[index].song.title);
        println!("Artist: {}", songs[index].song.artist);
        println!("\nWARNING: this permanently removes the song from your liked songs.");
        if self.confirm("Delete this song?")? {
            let removed = songs.remove(index);
            liked::save_for_user(&self.root, username, &songs)?;
            println!("'{}' was deleted from your collection.\n", removed.song.title);
        } else {
            println!("Song deletion cancelled.\n");
        }
        Ok(())
    }

    // ----- Service-backed screens -----

    async fn recommendation_screen(&mut self, username: &str) -> Result<()> {
        println!("\n=== Song Recommendations ===");
        println!("[1] Recommend More Songs by Same Artist");
        println!("[2] Recommend Songs in Same Genre");
        println!("[3] Recommend Popular Songs");
        println!("[B] Back");
        let choice = self.prompt("Select an option: ")?.to_uppercase();

        let liked = self.load_liked(username)?;
        let exclude_titles: Vec<String> = liked.iter().map(|s| s.song.title.clone()).collect();

        let request = match choice.as_str() {
            "1" | "2" => {
                let title =
                    self.prompt("Pick a song from your playlist to base it on: ")?;
                let Some(seed) = liked
                    .iter()
                    .find(|s| s.song.title.eq_ignore_ascii_case(&title))
                else {
                    println!("Song not found in your playlist.\n");
                    return Ok(());
                };
                if choice == "1" {
                    Request::RecommendByArtist {
                        artist: seed.song.artist.clone(),
                        exclude_titles,
                        auth_key: None,
                    }
                } else {
                    Request::RecommendByGenre {
                        genre: seed.song.genre.clone(),
                        exclude_titles,
                        auth_key: None,
                    }
                }
            }
            "3" => Request::RecommendPopular {
                exclude_titles,
                auth_key: None,
            },
            "B" => return Ok(()),
            _ => {
                println!("Invalid input.\n");
                return Ok(());
            }
        };

        let recommendations = match self.services.recommend.call(&request).await {
            Ok(Response::Recommendations { recommendations }) => recommendations,
            Ok(Response::Error { error }) => {
                println!("Recommendation service error: {error}\n");
                return Ok(());
            }
            Ok(other) => {
                warn!(?other, "unexpected recommendation reply shape");
                println!("Unexpected reply from the recommendation service.\n");
                return Ok(());
            }
            Err(e) if e.is_timeout() => {
                println!("The recommendation service timed out. Try again later.\n");
                return Ok(());
            }
            Err(e) => {
                println!("Could not reach the recommendation service: {e}\n");
                return Ok(());
            }
        };

        if recommendations.is_empty() {
            println!("No recommendations found.\n");
            return Ok(());
        }
        println!("\nRecommended Songs:");
        for (i, song) in recommendations.iter().enumerate() {
            println!("{}. {} - {} ({})", i + 1, song.title, song.artist, song.genre);
        }
        let choice = self.prompt("Add one to liked? Enter number or [N] to skip: ")?;
        if choice.eq_ignore_ascii_case("n") {
            return Ok(());
        }
        match choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| recommendations.get(i))
        {
            Some(song) => self.add_from_service(username, song.clone())?,
            None => println!("Invalid selection.\n"),
        }
        Ok(())
    }

    async fn random_song_screen(&mut self, username: &str) -> Result<()> {
        println!("\n=== Surprise Me ===");
        match self.services.random.call(&Request::RandomSong).await {
            Ok(Response::Song { song }) => {
                println!("How about this one?");
                println!(
                    "{} - {} ({}, {})",
                    song.title,
                    song.artist,
                    song.genre,
                    song.year
                        .map_or_else(|| "Unknown".to_owned(), |y| y.to_string())
                );
                if self.confirm("Add it to your liked songs?")? {
                    self.add_from_service(username, song)?;
                }
            }
            Ok(Response::Error { error }) => println!("Random-song service error: {error}\n"),
            Ok(other) => {
                warn!(?other, "unexpected random-song reply shape");
                println!("Unexpected reply from the random-song service.\n");
            }
            Err(e) if e.is_timeout() => {
                println!("The random-song service timed out. Try again later.\n");
            }
            Err(e) => println!("Could not reach the random-song service: {e}\n"),
        }
        Ok(())
    }

    async fn song_by_year_screen(&mut self, username: &str) -> Result<()> {
        println!("\n=== Song From a Year ===");
        let year = self.prompt("Enter a year (or [B] Back): ")?;
        if year.eq_ignore_ascii_case("b") {
            return Ok(());
        }
        let Ok(year) = year.parse::<i64>() else {
            println!("Please enter a whole year, like 2010.\n");
            return Ok(());
        };

        let request = Request::GetSongByYear {
            year: Value::from(year),
        };
        match self.services.song_by_year.call(&request).await {
            Ok(Response::Songs { songs }) => match songs.into_iter().next() {
                Some(song) => {
                    println!("From {year}:");
                    println!("{} - {} ({})", song.title, song.artist, song.genre);
                    if self.confirm("Add it to your liked songs?")? {
                        self.add_from_service(username, song)?;
                    }
                }
                None => println!("No songs found for {year}.\n"),
            },
            Ok(Response::Error { error }) => println!("Song-by-year service error: {error}\n"),
            Ok(other) => {
                warn!(?other, "unexpected song-by-year reply shape");
                println!("Unexpected reply from the song-by-year service.\n");
            }
            Err(e) if e.is_timeout() => {
                println!("The song-by-year service timed out. Try again later.\n");
            }
            Err(e) => println!("Could not reach the song-by-year service: {e}\n"),
        }
        Ok(())
    }

    async fn total_duration_screen(&mut self, username: &str) -> Result<()> {
        println!("\n=== Total Listening Time ===");
        let request = Request::GetTotalDuration {
            username: username.to_owned(),
        };
        match self.services.total_duration.call(&request).await {
            Ok(Response::Duration(summary)) => {
                if let Some(note) = &summary.note {
                    println!("{note}");
                }
                println!(
                    "Total listening time: {} ({} songs counted, {} skipped)\n",
                    summary.readable, summary.count_songs, summary.skipped
                );
            }
            Ok(Response::Error { error }) => println!("Total-duration service error: {error}\n"),
            Ok(other) => {
                warn!(?other, "unexpected total-duration reply shape");
                println!("Unexpected reply from the total-duration service.\n");
            }
            Err(e) if e.is_timeout() => {
                println!("The total-duration service timed out. Try again later.\n");
            }
            Err(e) => println!("Could not reach the total-duration service: {e}\n"),
        }
        Ok(())
    }

    // ----- Store helpers -----

    fn load_liked(&self, username: &str) -> Result<Vec<LikedSong>> {
        liked::load_for_user(&self.root, username)
    }

    fn append_liked(&self, username: &str, entry: LikedSong) -> Result<()> {
        let mut songs = self.load_liked(username)?;
        songs.push(entry);
        liked::save_for_user(&self.root, username, &songs)
    }

    fn add_from_service(&self, username: &str, song: SongRecord) -> Result<()> {
        let title = song.title.clone();
        self.append_liked(
            username,
            LikedSong {
                song,
                date_added: Some(today()),
            },
        )?;
        println!("'{title}' added to your liked songs.\n");
        Ok(())
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn display_duration(duration: Option<&RawDuration>) -> String {
    match duration {
        Some(RawDuration::Int(v)) => v.to_string(),
        Some(RawDuration::Float(v)) => v.to_string(),
        Some(RawDuration::Text(s)) => s.clone(),
        None => "Unknown".to_owned(),
    }
}

fn print_song_info(entry: &LikedSong) {
    println!("\n=== Song Info ===");
    println!("Title:      {}", entry.song.title);
    println!("Artist:     {}", entry.song.artist);
    println!("Genre:      {}", entry.song.genre);
    println!(
        "Year:       {}",
        entry
            .song
            .year
            .map_or_else(|| "Unknown".to_owned(), |y| y.to_string())
    );
    println!("Duration:   {}", display_duration(entry.song.duration.as_ref()));
    println!(
        "Date added: {}\n",
        entry.date_added.as_deref().unwrap_or("Unknown")
    );
}
