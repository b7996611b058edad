//! Static page copy and structure.
//!
//! Everything the visitor reads lives here so controllers stay free of
//! text. Copy is pt-BR only.

use crate::lazy_image::LazyImageSpec;
use crate::popup::ModalLayout;

#[derive(Debug, Clone)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub cta_label: &'static str,
    pub cta_href: &'static str,
}

/// A content block revealed on scroll.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    /// Lazy images shown in this section, by id.
    pub images: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone)]
pub struct PopupCopy {
    pub title: &'static str,
    pub body: &'static str,
    pub cta_label: &'static str,
    pub cta_href: &'static str,
    pub close_label: &'static str,
}

#[derive(Debug, Clone)]
pub struct DiagnosisCopy {
    pub title: &'static str,
    pub lead: &'static str,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone)]
pub struct PageContent {
    pub nav: Vec<NavLink>,
    pub hero: Hero,
    pub sections: Vec<Section>,
    pub diagnosis: DiagnosisCopy,
    pub offer_title: &'static str,
    pub countdown_label: &'static str,
    /// Unit captions under the days, hours, minutes and seconds fields.
    pub countdown_units: [&'static str; 4],
    pub faq_title: &'static str,
    pub faq: Vec<FaqItem>,
    pub images: Vec<LazyImageSpec>,
    pub popup: PopupCopy,
    pub footer: &'static str,
}

/// Ids of the fixed page anchors.
pub mod ids {
    pub const HERO: &str = "hero";
    pub const DIAGNOSIS: &str = "diagnostico";
    pub const AI_RESULT: &str = "ai-result";
    pub const OFFER: &str = "oferta";
    pub const COUNTDOWN: &str = "countdown-timer";
    pub const FAQ: &str = "faq";
    pub const CLOSE_POPUP: &str = "close-popup";
    pub const POPUP_CTA: &str = "popup-cta";
}

impl PageContent {
    /// Focusable children of the exit popup, in document order.
    pub fn modal_layout(&self) -> ModalLayout {
        ModalLayout {
            focusables: vec![ids::CLOSE_POPUP.to_string(), ids::POPUP_CTA.to_string()],
            close_control: ids::CLOSE_POPUP.to_string(),
        }
    }

    /// Every element id a `#` link may point at.
    pub fn anchor_targets(&self) -> Vec<&'static str> {
        let mut targets = vec![ids::HERO, ids::DIAGNOSIS, ids::OFFER, ids::FAQ];
        targets.extend(self.sections.iter().map(|s| s.id));
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            nav: vec![
                NavLink {
                    label: "Benefícios",
                    href: "#beneficios",
                },
                NavLink {
                    label: "Diagnóstico",
                    href: "#diagnostico",
                },
                NavLink {
                    label: "Oferta",
                    href: "#oferta",
                },
                NavLink {
                    label: "FAQ",
                    href: "#faq",
                },
            ],
            hero: Hero {
                eyebrow: "E-book",
                title: "O Poder da Reprogramação Mental",
                subtitle: "Domine seus padrões de pensamento e transforme intenção em performance.",
                cta_label: "Quero meu exemplar",
                cta_href: "#oferta",
            },
            sections: vec![
                Section {
                    id: "beneficios",
                    title: "O que você vai dominar",
                    paragraphs: &[
                        "Identificar as crenças que sabotam suas decisões.",
                        "Substituir hábitos automáticos por rotinas intencionais.",
                        "Manter o foco sob pressão com protocolos simples.",
                    ],
                    images: &["ebook-cover"],
                },
                Section {
                    id: "autor",
                    title: "Sobre o autor",
                    paragraphs: &[
                        "Mentor de alta performance com mais de uma década ajudando \
                         profissionais a reprogramar sua forma de pensar.",
                    ],
                    images: &["author-photo"],
                },
            ],
            diagnosis: DiagnosisCopy {
                title: "Diagnóstico de Performance com IA",
                lead: "Descreva o seu maior desafio hoje e receba uma análise personalizada.",
                placeholder: "Ex.: Procrastino tarefas importantes e me sinto sem energia...",
            },
            offer_title: "Oferta por tempo limitado",
            countdown_label: "A oferta termina em",
            countdown_units: ["dias", "horas", "min", "seg"],
            faq_title: "Perguntas frequentes",
            faq: vec![
                FaqItem {
                    question: "Para quem é este e-book?",
                    answer: "Para quem quer mais clareza, foco e consistência, \
                             em qualquer área da vida.",
                },
                FaqItem {
                    question: "Em quais formatos recebo o material?",
                    answer: "PDF e EPUB, com acesso imediato após a compra.",
                },
                FaqItem {
                    question: "Existe garantia?",
                    answer: "Sim. Você tem 7 dias para pedir reembolso integral.",
                },
                FaqItem {
                    question: "O diagnóstico com IA substitui uma mentoria?",
                    answer: "Não. Ele é um ponto de partida para aplicar os \
                             conceitos do e-book ao seu contexto.",
                },
            ],
            images: vec![
                LazyImageSpec {
                    id: "ebook-cover".into(),
                    alt: "Capa do e-book O Poder da Reprogramação Mental".into(),
                    src: None,
                    data_src: Some("img/capa.jpg".into()),
                    data_srcset: Some("img/capa-480.jpg 480w, img/capa-960.jpg 960w".into()),
                    data_sizes: Some("(max-width: 600px) 480px, 960px".into()),
                },
                LazyImageSpec {
                    id: "author-photo".into(),
                    alt: "Foto do autor".into(),
                    src: None,
                    data_src: Some("img/autor.jpg".into()),
                    data_srcset: None,
                    data_sizes: None,
                },
            ],
            popup: PopupCopy {
                title: "Espere! Antes de sair...",
                body: "Garanta o e-book com o desconto de hoje. A oferta não se repete.",
                cta_label: "Quero aproveitar",
                cta_href: "#oferta",
                close_label: "Fechar",
            },
            footer: "© O Poder da Reprogramação Mental. Todos os direitos reservados.",
        }
    }
}
