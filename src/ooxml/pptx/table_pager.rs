//! Splitting long tables across slides.

use crate::common::error::{ConfigurationError, Result};
use crate::ooxml::pptx::objects::{TableProps, TableRow};
use crate::ooxml::pptx::presentation::{AddSlideOptions, Presentation};
use crate::ooxml::pptx::slide::Slide;

impl Presentation {
    /// Add a table to slide `slide_number`, continuing it on new slides when
    /// it does not fit.
    ///
    /// Continuation slides are appended through [`add_slide`](Self::add_slide)
    /// with the same slide layout, and stay in the current section when the
    /// last slide belongs to it. Returns the numbers of every slide holding a
    /// part of the table, in order.
    pub fn add_table_paged(&mut self, slide_number: u32, rows: Vec<TableRow>, props: TableProps) -> Result<Vec<u32>> {
        if rows.is_empty() {
            return Err(ConfigurationError::EmptyTable.into());
        }
        let slide = self
            .slide(slide_number)
            .ok_or(ConfigurationError::UnknownSlide(slide_number))?;

        let capacity = self.rows_per_slide(slide, &props);
        let layout_index = slide.layout_index();
        let master_name = self.slide_layouts()[layout_index].name().to_string();
        let chunks = paginate(rows, capacity, props.repeat_header);
        log::debug!(slide = slide_number, pages = chunks.len(), rows_per_slide = capacity; "Paging table");

        let mut numbers = Vec::with_capacity(chunks.len());
        for (page, chunk) in chunks.into_iter().enumerate() {
            let slide = if page == 0 {
                self.require_slide_mut(slide_number)?
            } else {
                let options = AddSlideOptions {
                    master_name: (layout_index != 0).then(|| master_name.clone()),
                    section_title: self.continuing_section(),
                };
                self.add_slide(options)
            };
            numbers.push(slide.number());
            slide.add_table(chunk, props.clone())?;
        }
        Ok(numbers)
    }

    /// Rows that fit below the table's top edge, header included.
    fn rows_per_slide(&self, slide: &Slide, props: &TableProps) -> usize {
        if let Some(limit) = props.rows_per_slide {
            return limit.max(1);
        }
        let page = slide.layout();
        let top = props.position.resolve(page).y;
        let bottom_margin = self.slide_layouts()[slide.layout_index()].margin().insets_emu()[3];
        let available = page.height - top - bottom_margin;
        let row_height = props.row_height_emu().max(1);
        (available / row_height).max(1) as usize
    }

    /// Title of the last section when it holds the last slide.
    fn continuing_section(&self) -> Option<String> {
        let last_slide = self.slides().last()?.number();
        self.sections()
            .last()
            .filter(|section| section.slide_numbers.contains(&last_slide))
            .map(|section| section.title.clone())
    }
}

/// Split `rows` into pages of at most `capacity` rows, repeating the first
/// row at the top of every page when `repeat_header` is set.
fn paginate(rows: Vec<TableRow>, capacity: usize, repeat_header: bool) -> Vec<Vec<TableRow>> {
    let capacity = capacity.max(1);
    if !repeat_header || rows.len() < 2 || capacity < 2 {
        return chunk_rows(rows, capacity);
    }

    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    chunk_rows(rows.collect(), capacity - 1)
        .into_iter()
        .map(|body| {
            let mut page = Vec::with_capacity(body.len() + 1);
            page.push(header.clone());
            page.extend(body);
            page
        })
        .collect()
}

fn chunk_rows(rows: Vec<TableRow>, size: usize) -> Vec<Vec<TableRow>> {
    let mut pages = Vec::new();
    let mut current = Vec::with_capacity(size);
    for row in rows {
        current.push(row);
        if current.len() == size {
            pages.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::ooxml::pptx::master::SlideMasterProps;
    use crate::ooxml::pptx::objects::SlideObject;
    use proptest::prelude::*;

    fn rows(n: usize) -> Vec<TableRow> {
        (0..n).map(|i| vec![format!("r{}", i).into(), "x".into()]).collect()
    }

    fn table_rows(slide: &Slide) -> Vec<String> {
        slide
            .objects()
            .iter()
            .filter_map(|o| match o {
                SlideObject::Table(t) => Some(t.rows.iter().map(|r| r[0].text.clone()).collect::<Vec<_>>()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_paging_with_repeated_header() {
        let mut pres = Presentation::new();
        pres.add_slide(AddSlideOptions::default());
        let props = TableProps {
            repeat_header: true,
            rows_per_slide: Some(3),
            ..Default::default()
        };
        let numbers = pres.add_table_paged(1, rows(6), props).unwrap();

        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(table_rows(pres.slide(1).unwrap()), ["r0", "r1", "r2"]);
        assert_eq!(table_rows(pres.slide(2).unwrap()), ["r0", "r3", "r4"]);
        assert_eq!(table_rows(pres.slide(3).unwrap()), ["r0", "r5"]);
    }

    #[test]
    fn test_rows_per_slide_from_page_height() {
        let mut pres = Presentation::new();
        pres.add_slide(AddSlideOptions::default());
        // 16:9 page is 5.625in tall; 1in top and 0.5in bottom margin leave
        // room for ten 0.4in rows.
        let numbers = pres.add_table_paged(1, rows(25), TableProps::default()).unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(table_rows(pres.slide(3).unwrap()).len(), 5);
    }

    #[test]
    fn test_continuation_keeps_layout_and_section() {
        let mut pres = Presentation::new();
        pres.define_slide_master(SlideMasterProps::new("DATA")).unwrap();
        pres.add_section("Tables", None);
        pres.add_slide(AddSlideOptions {
            master_name: Some("DATA".into()),
            section_title: Some("Tables".into()),
        });

        let props = TableProps {
            rows_per_slide: Some(2),
            ..Default::default()
        };
        let numbers = pres.add_table_paged(1, rows(4), props).unwrap();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(pres.slide(2).unwrap().layout_index(), 1);
        assert_eq!(pres.sections().len(), 1);
        assert_eq!(pres.sections()[0].slide_numbers, vec![1, 2]);
    }

    #[test]
    fn test_errors_leave_document_untouched() {
        let mut pres = Presentation::new();
        assert!(matches!(
            pres.add_table_paged(1, rows(2), TableProps::default()),
            Err(Error::Configuration(ConfigurationError::UnknownSlide(1)))
        ));
        pres.add_slide(AddSlideOptions::default());
        assert!(pres.add_table_paged(1, Vec::new(), TableProps::default()).is_err());
        assert_eq!(pres.slide_count(), 1);
        assert!(pres.slide(1).unwrap().objects().is_empty());
    }

    proptest! {
        #[test]
        fn prop_paginate_keeps_every_row(n in 1usize..60, capacity in 1usize..12, header in any::<bool>()) {
            let pages = paginate(rows(n), capacity, header);
            let repeated = header && n >= 2 && capacity >= 2;
            let body: usize = pages
                .iter()
                .map(|p| if repeated { p.len() - 1 } else { p.len() })
                .sum();
            prop_assert_eq!(body, if repeated { n - 1 } else { n });
            prop_assert!(pages.iter().all(|p| !p.is_empty() && p.len() <= capacity));
        }
    }
}
