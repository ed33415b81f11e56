use cuetone::{Cue, CueToneDesc, CueToneEngine, OneShot, SoundToggle};
use egui::{Color32, Id, Response, RichText};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    About,
    Projects,
    Contact,
}

impl Page {
    const ALL: [Page; 4] = [Page::Home, Page::About, Page::Projects, Page::Contact];

    fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Projects => "Projects",
            Page::Contact => "Contact",
        }
    }
}

const PROJECTS: [(&str, &str); 4] = [
    ("Weather Station", "Sensor logging with a live dashboard"),
    ("Chess Engine", "Bitboard move generation and alpha-beta search"),
    ("Pixel Editor", "Layered sprite editing with palette swaps"),
    ("Trail Map", "Offline vector tiles for hiking routes"),
];

/// Degrees of carousel rotation between whoosh cues
const CAROUSEL_STEP: f32 = 30.0;

pub struct PortfolioDemo {
    sound: SoundToggle,
    engine: CueToneEngine,
    page: Page,
    // one load melody per page, first visit only
    page_loaded: [OneShot; 4],

    // UI state
    hovered_last_frame: HashSet<Id>,
    hovered_this_frame: HashSet<Id>,
    carousel_angle: f32,
    carousel_step: i32,
    selected_project: Option<usize>,
    contact_name: String,
    contact_message: String,
    messages_sent: usize,
}

impl PortfolioDemo {
    pub fn new() -> Self {
        // Initialize logger
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        let sound = SoundToggle::default();
        let engine = CueToneEngine::new(CueToneDesc::default(), sound.clone())
            .expect("Failed to create cue engine");
        log::info!("Cue engine created, output opens on the first cue");

        Self {
            sound,
            engine,
            page: Page::Home,
            page_loaded: Default::default(),
            hovered_last_frame: HashSet::new(),
            hovered_this_frame: HashSet::new(),
            carousel_angle: 0.0,
            carousel_step: 0,
            selected_project: None,
            contact_name: String::new(),
            contact_message: String::new(),
            messages_sent: 0,
        }
    }

    /// Hover cue on the frame the pointer enters `response`
    fn hover_cue(&mut self, response: &Response) {
        if response.hovered() {
            self.hovered_this_frame.insert(response.id);
            if !self.hovered_last_frame.contains(&response.id) {
                self.engine.play_hover_sound();
            }
        }
    }

    fn draw_nav(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for page in Page::ALL {
                let response = ui.selectable_label(self.page == page, page.title());
                if response.clicked() && self.page != page {
                    self.engine.play_nav_sound();
                    self.page = page;
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut enabled = self.sound.is_enabled();
                if ui.checkbox(&mut enabled, "Sound").changed() {
                    self.sound.set_enabled(enabled);
                }
            });
        });
    }

    fn draw_home(&mut self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Hi, I build things for the web").size(28.0));
        ui.label("Every control on this page triggers a synthesized cue.");
        ui.add_space(16.0);

        ui.horizontal(|ui| {
            let projects = ui.button("View projects");
            self.hover_cue(&projects);
            if projects.clicked() {
                self.engine.play_button_sound();
                self.page = Page::Projects;
            }

            let contact = ui.button("Get in touch");
            self.hover_cue(&contact);
            if contact.clicked() {
                self.engine.play_button_sound();
                self.page = Page::Contact;
            }
        });
    }

    fn draw_about(&mut self, ui: &mut egui::Ui) {
        ui.heading("About");
        ui.label("Developer who likes small tools, fast feedback and quiet UIs.");
        ui.add_space(8.0);

        for skill in ["Rust", "TypeScript", "Audio DSP", "Embedded"] {
            let label = egui::Label::new(format!("• {}", skill)).sense(egui::Sense::hover());
            let response = ui.add(label);
            self.hover_cue(&response);
        }
    }

    fn draw_projects(&mut self, ui: &mut egui::Ui) {
        ui.heading("Projects");

        let previous = self.carousel_angle;
        ui.add(egui::Slider::new(&mut self.carousel_angle, 0.0..=360.0).text("carousel"));
        if self.carousel_angle != previous {
            let step = (self.carousel_angle / CAROUSEL_STEP).floor() as i32;
            if step != self.carousel_step {
                self.carousel_step = step;
                self.engine.play_whoosh_sound();
            }
        }
        ui.add_space(8.0);

        let first = (self.carousel_step.rem_euclid(PROJECTS.len() as i32)) as usize;
        ui.horizontal_wrapped(|ui| {
            for offset in 0..PROJECTS.len() {
                let index = (first + offset) % PROJECTS.len();
                let (name, blurb) = PROJECTS[index];
                let selected = self.selected_project == Some(index);

                let card = ui.add(
                    egui::Button::new(format!("{}\n{}", name, blurb))
                        .min_size(egui::vec2(170.0, 70.0))
                        .selected(selected),
                );
                self.hover_cue(&card);
                if card.clicked() {
                    self.engine.play_click_sound();
                    self.selected_project = if selected { None } else { Some(index) };
                }
            }
        });
    }

    fn draw_contact(&mut self, ui: &mut egui::Ui) {
        ui.heading("Contact");

        ui.label("Name");
        ui.text_edit_singleline(&mut self.contact_name);
        ui.label("Message");
        ui.text_edit_multiline(&mut self.contact_message);

        let ready = !self.contact_name.trim().is_empty() && !self.contact_message.trim().is_empty();
        let send = ui.add_enabled(ready, egui::Button::new("Send message"));
        self.hover_cue(&send);
        if send.clicked() {
            self.engine.play_success_sound();
            self.messages_sent += 1;
            self.contact_message.clear();
            log::info!("Message from {} sent", self.contact_name);
        }

        if self.messages_sent > 0 {
            ui.colored_label(
                Color32::from_rgb(80, 200, 120),
                format!("Thanks! {} message(s) sent.", self.messages_sent),
            );
        }
    }
}

impl eframe::App for PortfolioDemo {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.hovered_this_frame.clear();

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            self.draw_nav(ui);
        });

        let page_index = Page::ALL
            .iter()
            .position(|page| *page == self.page)
            .unwrap_or(0);
        self.page_loaded[page_index].fire(&self.engine, Cue::Load);

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Home => self.draw_home(ui),
            Page::About => self.draw_about(ui),
            Page::Projects => self.draw_projects(ui),
            Page::Contact => self.draw_contact(ui),
        });

        std::mem::swap(&mut self.hovered_last_frame, &mut self.hovered_this_frame);
    }
}
