// src/services/document_service.rs

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Alignment, Element, Margins};

use crate::{
    common::{error::AppError, money::format_amount},
    config::Config,
    models::{
        contract::Contract,
        quote::{Modality, Quote, ServiceLine},
        settings::CompanyProfile,
    },
};

const ABOUT_US_BOILERPLATE: &str = "Somos una firma consultora especializada en el diseño, optimización y \
estandarización de procesos comerciales y logísticos. Nuestro equipo reúne experiencia en gestión \
comercial, mejora de procesos, logística y transformación digital.\n\
Acompañamos a MYPEs e industrias en la implementación de metodologías de gestión eficientes, \
herramientas digitales y modelos de atención al cliente que mejoran la productividad y generan \
crecimiento sostenible.";

const QUOTE_CONFIDENTIALITY: &str = "Toda la información proporcionada por el cliente será tratada con \
absoluta reserva y utilizada exclusivamente para el desarrollo del plan comercial. El consultor se \
compromete a mantener estricta confidencialidad y aplicar el máximo cuidado profesional en el manejo \
de datos sensibles relacionados con la organización.";

const NEXT_STEPS: [&str; 4] = [
    "1. Confirmación de interés por parte del cliente.",
    "2. Aprobación formal de la propuesta presentada.",
    "3. Coordinación y agendamiento de la primera sesión de trabajo.",
    "4. Inicio de la ejecución del proyecto en la fecha acordada.",
];

const CLOSING: &str =
    "Gracias por la confianza. Estoy a disposición para cualquier duda adicional o coordinación.";

// ==========================================
// Layout: ordered blocks, independent of the PDF backend
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Letterhead {
        name: String,
        address: String,
        phone: String,
        email: String,
        logo: Option<PathBuf>,
    },
    Title(String),
    Heading(String),
    Paragraph(String),
    RightAligned(String),
    Bullet { text: String, indent: u8 },
    Emphasis(String),
    Image(PathBuf),
    Break(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl DocumentLayout {
    fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), blocks: Vec::new() }
    }

    fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    fn section(&mut self, heading: &str, body: &str) -> &mut Self {
        self.push(Block::Heading(heading.to_string()));
        if !body.trim().is_empty() {
            self.push(Block::Paragraph(body.to_string()));
        }
        self.push(Block::Break(0.5))
    }

    /// Section headings in document order.
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn letterhead(profile: &CompanyProfile) -> Block {
    Block::Letterhead {
        name: profile.name.clone(),
        address: profile.address.clone(),
        phone: profile.phone.clone(),
        email: profile.email.clone(),
        logo: profile.logo.as_ref().map(PathBuf::from),
    }
}

fn modality_text(modality: &[Modality]) -> String {
    modality
        .iter()
        .map(|m| match m {
            Modality::Presencial => "Presencial",
            Modality::Virtual => "Virtual",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// Contracts converted from a quote carry the service lines as JSON.
fn readable_services(raw: &str) -> String {
    match serde_json::from_str::<Vec<ServiceLine>>(raw) {
        Ok(lines) => lines.into_iter().map(|l| l.name).collect::<Vec<_>>().join(", "),
        Err(_) if raw.trim().is_empty() => "No especificado".to_string(),
        Err(_) => raw.to_string(),
    }
}

fn readable_deliverables(raw: &str) -> String {
    match serde_json::from_str::<Vec<crate::models::quote::DeliverableLine>>(raw) {
        Ok(lines) => lines.into_iter().map(|l| l.name).collect::<Vec<_>>().join(", "),
        Err(_) if raw.trim().is_empty() => "No especificado".to_string(),
        Err(_) => raw.to_string(),
    }
}

// ==========================================
// Service
// ==========================================

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_family: String,
    output_dir: PathBuf,
    signature_image: Option<PathBuf>,
}

impl DocumentService {
    pub fn new(config: &Config) -> Self {
        Self {
            fonts_dir: config.fonts_dir.clone(),
            font_family: config.font_family.clone(),
            output_dir: config.documents_dir.clone(),
            signature_image: config.signature_image.clone(),
        }
    }

    pub fn quote_file_name(number: &str) -> String {
        format!("COT-{}.pdf", sanitize_file_part(number))
    }

    pub fn contract_file_name(id: i64) -> String {
        format!("Contrato_{id}.pdf")
    }

    /// Pure function of the quote and the letterhead.
    pub fn quote_layout(&self, quote: &Quote, profile: &CompanyProfile) -> DocumentLayout {
        let mut doc = DocumentLayout::new(format!("Cotización {}", quote.number));

        doc.push(letterhead(profile))
            .push(Block::Title(format!("Cotización: {}", quote.number)))
            .push(Block::RightAligned(format!("Fecha: {}", quote.date.format("%d/%m/%Y"))))
            .push(Block::Break(1.0));

        let about_us = if profile.about_us.trim().is_empty() {
            ABOUT_US_BOILERPLATE
        } else {
            profile.about_us.as_str()
        };
        doc.section("Sobre Nosotros", about_us);

        doc.push(Block::Heading("Datos de cliente".into()))
            .push(Block::Paragraph(format!(
                "Cliente: {}\nRUC: {}\nDirección: {}\nTeléfono: {}\nContacto: {} ({})\nSector: {}",
                quote.client,
                quote.tax_id,
                quote.address,
                quote.phone,
                quote.contact,
                quote.contact_title,
                quote.sector
            )))
            .push(Block::Break(0.5));

        doc.section("Problemática del cliente", &quote.problem);

        doc.push(Block::Heading("Servicios".into()));
        for service in &quote.services {
            doc.push(Block::Bullet { text: service.name.clone(), indent: 0 });
        }
        doc.push(Block::Break(0.5));

        doc.push(Block::Heading("Entregables".into()));
        for deliverable in &quote.deliverables {
            doc.push(Block::Bullet { text: deliverable.name.clone(), indent: 0 });
            if !deliverable.description.trim().is_empty() {
                doc.push(Block::Bullet { text: deliverable.description.clone(), indent: 1 });
            }
        }
        doc.push(Block::Break(0.5));

        doc.section(
            "Tiempo y Modalidad",
            &format!(
                "Total de horas: {}\nDías estimados: {}\nSesiones previstas: {}\nModalidad: {}",
                quote.total_hours.normalize(),
                quote.estimated_days.normalize(),
                quote.sessions,
                modality_text(&quote.modality)
            ),
        );
        doc.section("Requisitos Básicos para Iniciar la Consultoría", &quote.requirements);
        doc.section("Cláusula de Confidencialidad", QUOTE_CONFIDENTIALITY);
        doc.section("Próximos Pasos", &NEXT_STEPS.join("\n"));
        doc.section("Valor agregado", &quote.value_add);
        doc.section("Condiciones de pago", &quote.payment_conditions);

        doc.push(Block::Emphasis(format!(
            "TOTAL A PAGAR NO FACTURADO: S/. {}",
            format_amount(quote.monto)
        )))
        .push(Block::Break(1.5))
        .push(Block::RightAligned(CLOSING.into()))
        .push(Block::RightAligned("Atentamente,".into()));

        if let Some(signature) = &self.signature_image {
            doc.push(Block::Break(2.0)).push(Block::Image(signature.clone()));
        }

        doc
    }

    pub fn contract_layout(&self, contract: &Contract, profile: &CompanyProfile) -> DocumentLayout {
        let mut doc = DocumentLayout::new(format!("Contrato {}", contract.id));
        let date = contract.start_date.format("%d/%m/%Y").to_string();
        let end = contract
            .end_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "Por definir".into());

        doc.push(letterhead(profile))
            .push(Block::Title("CONTRATO DE SERVICIOS DE CONSULTORÍA".into()))
            .push(Block::Paragraph(format!(
                "Entre {}, en adelante \"LA CONSULTORA\", y {}, en adelante \"EL CLIENTE\", se acuerda lo siguiente:",
                profile.name, contract.client
            )))
            .push(Block::Break(0.5));

        doc.section("1. Objeto del Contrato", &contract.title);
        doc.section(
            "2. Servicios y Entregables",
            &format!(
                "Servicios: {}\nEntregables: {}",
                readable_services(&contract.services),
                readable_deliverables(&contract.deliverables)
            ),
        );
        doc.section(
            "3. Condiciones Económicas",
            &format!(
                "EL CLIENTE pagará a LA CONSULTORA la suma de S/. {}.\nForma de pago: {}.",
                format_amount(contract.monto),
                contract.payment_method
            ),
        );
        doc.section("4. Plazos y Vigencia", &format!("Inicio: {date}  -  Fin: {end}."));
        doc.section(
            "5. Obligaciones de las Partes",
            "- LA CONSULTORA: Cumplir con los entregables acordados en tiempo y forma.\n\
             - EL CLIENTE: Proporcionar la información necesaria y efectuar los pagos en las fechas acordadas.",
        );
        doc.section(
            "6. Confidencialidad",
            "Toda la información compartida será tratada de manera confidencial.",
        );
        doc.section(
            "7. Terminación",
            "Este contrato podrá resolverse por incumplimiento de cualquiera de las partes.",
        );
        doc.section(
            "8. Firmas",
            &format!(
                "En señal de conformidad, ambas partes firman el presente contrato a la fecha {}.\n\
                 Firma Empresa ({}): {}\nFirma Cliente ({}): {}",
                date,
                profile.name,
                contract.company_signature.as_deref().unwrap_or("________________"),
                contract.client,
                contract.client_signature.as_deref().unwrap_or("________________"),
            ),
        );

        if !contract.observations.trim().is_empty() {
            doc.section("Observaciones adicionales", &contract.observations);
        }

        doc
    }

    /// Renders to PDF bytes. A missing font is an error; missing images are skipped.
    pub async fn render(&self, layout: DocumentLayout) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        let font_family = self.font_family.clone();

        tokio::task::spawn_blocking(move || render_pdf(&layout, &fonts_dir, &font_family))
            .await
            .map_err(|e| anyhow::anyhow!("Render task failed: {}", e))?
    }

    /// Renders and writes `<documents dir>/<file_name>`.
    pub async fn write(&self, layout: DocumentLayout, file_name: &str) -> Result<PathBuf, AppError> {
        let bytes = self.render(layout).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!("Document written: {}", path.display());
        Ok(path)
    }
}

pub(crate) fn sanitize_file_part(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

// ==========================================
// genpdf backend
// ==========================================

fn render_pdf(layout: &DocumentLayout, fonts_dir: &Path, font_family: &str) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, font_family, None).map_err(|e| {
        AppError::DocumentRender(format!(
            "font '{}' not found in {}: {}",
            font_family,
            fonts_dir.display(),
            e
        ))
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(layout.title.clone());
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    for block in &layout.blocks {
        push_block(&mut doc, block);
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::DocumentRender(e.to_string()))?;

    Ok(buffer)
}

fn push_lines(doc: &mut genpdf::Document, text: &str, style: style::Style, alignment: Alignment) {
    for line in text.lines() {
        if line.trim().is_empty() {
            doc.push(elements::Break::new(1));
            continue;
        }
        let mut paragraph = elements::Paragraph::new(line.to_string());
        paragraph.set_alignment(alignment);
        doc.push(paragraph.styled(style));
    }
}

fn push_image(doc: &mut genpdf::Document, path: &Path, alignment: Alignment) {
    if !path.exists() {
        tracing::warn!("Image {} not found, skipped", path.display());
        return;
    }
    match elements::Image::from_path(path) {
        Ok(image) => doc.push(
            image
                .with_alignment(alignment)
                .with_scale(genpdf::Scale::new(0.5, 0.5)),
        ),
        Err(e) => tracing::warn!("Image {} could not be loaded, skipped: {}", path.display(), e),
    }
}

fn push_block(doc: &mut genpdf::Document, block: &Block) {
    let normal = style::Style::new().with_font_size(11);
    let bold = style::Style::new().bold().with_font_size(11);

    match block {
        Block::Letterhead { name, address, phone, email, logo } => {
            if let Some(logo) = logo {
                push_image(doc, logo, Alignment::Right);
            }
            doc.push(
                elements::Paragraph::new(name.clone())
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            let small = style::Style::new().with_font_size(10);
            push_lines(doc, address, small, Alignment::Left);
            push_lines(doc, &format!("Tel: {phone}\nEmail: {email}"), small, Alignment::Left);
            doc.push(elements::Break::new(1.5));
        }
        Block::Title(text) => {
            push_lines(doc, text, style::Style::new().bold().with_font_size(13), Alignment::Center);
        }
        Block::Heading(text) => push_lines(doc, text, bold, Alignment::Left),
        Block::Paragraph(text) => push_lines(doc, text, normal, Alignment::Left),
        Block::RightAligned(text) => push_lines(doc, text, normal, Alignment::Right),
        Block::Bullet { text, indent } => {
            let left = 5.0 * f64::from(*indent);
            doc.push(
                elements::Paragraph::new(format!("- {text}"))
                    .styled(normal)
                    .padded(Margins::trbl(0.0, 0.0, 0.0, left)),
            );
        }
        Block::Emphasis(text) => {
            push_lines(doc, text, style::Style::new().bold().with_font_size(12), Alignment::Left);
        }
        Block::Image(path) => push_image(doc, path, Alignment::Center),
        Block::Break(lines) => doc.push(elements::Break::new(*lines)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::{DeliverableLine, QuoteStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn service() -> DocumentService {
        DocumentService {
            fonts_dir: PathBuf::from("does-not-exist"),
            font_family: "Roboto".into(),
            output_dir: std::env::temp_dir(),
            signature_image: Some(PathBuf::from("firma.png")),
        }
    }

    fn quote() -> Quote {
        let mut quote = Quote {
            number: "0001".into(),
            client: "Acme".into(),
            tax_id: "20123456789".into(),
            address: "Lima".into(),
            phone: "999".into(),
            contact: "Jane".into(),
            contact_title: "CEO".into(),
            sector: "Tecnología".into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            problem: "Ventas bajas".into(),
            services: vec![ServiceLine {
                name: "Audit".into(),
                hours: Decimal::from(10),
                rate: Decimal::from(50),
                subtotal: Decimal::from(500),
            }],
            deliverables: vec![DeliverableLine {
                name: "Informe".into(),
                description: "Diagnóstico completo".into(),
                subtotal: Decimal::ZERO,
            }],
            value_add: "Soporte".into(),
            payment_conditions: "50% adelanto".into(),
            monto: Decimal::from(1500),
            status: QuoteStatus::Drafted,
            hours_per_day: 8,
            sessions: 2,
            modality: vec![Modality::Presencial, Modality::Virtual],
            requirements: "Acceso a datos".into(),
            logo: None,
            created_by: "admin".into(),
            total_hours: Decimal::ZERO,
            estimated_days: Decimal::ZERO,
            decode_errors: vec![],
        };
        quote.refresh_derived().unwrap();
        quote
    }

    #[test]
    fn quote_sections_follow_the_printed_order() {
        let layout = service().quote_layout(&quote(), &CompanyProfile::default());

        assert_eq!(
            layout.headings(),
            vec![
                "Sobre Nosotros",
                "Datos de cliente",
                "Problemática del cliente",
                "Servicios",
                "Entregables",
                "Tiempo y Modalidad",
                "Requisitos Básicos para Iniciar la Consultoría",
                "Cláusula de Confidencialidad",
                "Próximos Pasos",
                "Valor agregado",
                "Condiciones de pago",
            ]
        );
        assert!(matches!(layout.blocks.first(), Some(Block::Letterhead { .. })));
        assert_eq!(layout.blocks.last(), Some(&Block::Image(PathBuf::from("firma.png"))));
        assert!(layout
            .blocks
            .contains(&Block::Emphasis("TOTAL A PAGAR NO FACTURADO: S/. 1,500.00".into())));
    }

    #[test]
    fn deliverable_descriptions_are_indented_under_their_name() {
        let layout = service().quote_layout(&quote(), &CompanyProfile::default());
        let position = |b: &Block| layout.blocks.iter().position(|x| x == b).unwrap();

        let name = position(&Block::Bullet { text: "Informe".into(), indent: 0 });
        let description = position(&Block::Bullet { text: "Diagnóstico completo".into(), indent: 1 });
        assert_eq!(description, name + 1);
    }

    #[test]
    fn profile_about_us_replaces_boilerplate() {
        let profile = CompanyProfile { about_us: "Nosotros".into(), ..CompanyProfile::default() };
        let layout = service().quote_layout(&quote(), &profile);
        assert!(layout.blocks.contains(&Block::Paragraph("Nosotros".into())));
        assert!(!layout.blocks.contains(&Block::Paragraph(ABOUT_US_BOILERPLATE.into())));
    }

    #[test]
    fn converted_contract_lists_service_names() {
        assert_eq!(
            readable_services(r#"[{"name":"Audit","hours":"10","rate":"50","subtotal":"500"}]"#),
            "Audit"
        );
        assert_eq!(readable_services("Consultoría libre"), "Consultoría libre");
        assert_eq!(readable_services(""), "No especificado");
    }

    #[test]
    fn file_names_are_path_safe() {
        assert_eq!(DocumentService::quote_file_name("Q/1 a"), "COT-Q_1_a.pdf");
        assert_eq!(DocumentService::contract_file_name(7), "Contrato_7.pdf");
    }

    #[tokio::test]
    async fn missing_font_is_a_render_error() {
        let layout = service().quote_layout(&quote(), &CompanyProfile::default());
        let result = service().render(layout).await;
        assert!(matches!(result, Err(AppError::DocumentRender(_))));
    }
}
